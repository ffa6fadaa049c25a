//! One template per calling convention
use super::{
	py_ident, py_string, CallTemplate, MemberContext, PyWriter, RuntimeFailure, MEMBER_RULE,
};
use crate::{
	classify::{ArrayBinder, BatchBody},
	type_map::BindingType,
};

/// `def name(self, a, b):` and its docstring, leaves the writer inside the body
fn open_member(w: &mut PyWriter, name: &str, params: &[String], doc: &str) {
	let mut signature = String::from("self");
	for p in params {
		signature.push_str(", ");
		signature.push_str(p);
	}
	w.indent();
	w.line(MEMBER_RULE);
	w.line(&format!("def {}({}):", name, signature)).indent();
	w.line("\"\"\"").raw(doc).line("\"\"\"");
}

fn close_member(mut w: PyWriter) -> Vec<String> {
	w.blank();
	w.into_lines()
}

/// `[a, b]`, or nothing when there are no parameters
fn argument_list(params: &[String]) -> Option<String> {
	if params.is_empty() {
		None
	} else {
		Some(format!("[{}]", params.join(", ")))
	}
}

/// Pre-call binders; `arrayvar` sizes each array to the list the caller passed
///
/// `params` are the names in the signature, the binder at position `n` rebinds the parameter at that position
fn write_binders(w: &mut PyWriter, ctx: &MemberContext, params: &[String], binders: &[ArrayBinder]) {
	for b in binders {
		let name = ctx
			.routine
			.parameters
			.iter()
			.position(|p| p.position == b.position)
			.and_then(|i| params.get(i).cloned())
			.unwrap_or_else(|| py_ident(&b.name));
		w.line(&format!("{0} = self.curs.arrayvar({1}, {0})", name, b.element.python_name()));
	}
}

fn write_autocommit(w: &mut PyWriter) {
	w.line("if self.autocommit:")
		.indent()
		.line("self.curs.connection.commit()")
		.dedent();
}

pub(super) fn scalar_function(ctx: &MemberContext, return_type: BindingType, binders: &[ArrayBinder]) -> Vec<String> {
	let params = ctx.parameter_names();
	let mut w = PyWriter::new();
	open_member(&mut w, &ctx.member_name(), &params, &ctx.doc_lines());
	write_binders(&mut w, ctx, &params, binders);
	let target = py_string(&ctx.call_target(), '\'');
	let call = match argument_list(&params) {
		Some(args) => format!("rv = self.curs.callfunc({}, {}, {})", target, return_type.python_name(), args),
		None => format!("rv = self.curs.callfunc({}, {})", target, return_type.python_name()),
	};
	w.line(&call);
	write_autocommit(&mut w);
	w.line("return rv");
	close_member(w)
}

pub(super) fn procedure(ctx: &MemberContext, binders: &[ArrayBinder]) -> Vec<String> {
	let params = ctx.parameter_names();
	let mut w = PyWriter::new();
	open_member(&mut w, &ctx.member_name(), &params, &ctx.doc_lines());
	write_binders(&mut w, ctx, &params, binders);
	let target = py_string(&ctx.call_target(), '\'');
	let call = match argument_list(&params) {
		Some(args) => format!("result = self.curs.callproc({}, {})", target, args),
		None => format!("result = self.curs.callproc({})", target),
	};
	w.line(&call);
	write_autocommit(&mut w);
	w.line("return result");
	close_member(w)
}

fn batch_doc(ctx: &MemberContext) -> String {
	format!(
		"{}\n        (this is the autogenerated vectorized _V procedure)\n        (dont use it if you have out parms)",
		ctx.doc_lines()
	)
}

fn batch_name(ctx: &MemberContext) -> String {
	format!("{}_V", ctx.member_name())
}

/// The `_V` form: one bind dictionary per row of `parmlist`, all rows submitted in one `executemany`
pub(super) fn batch_procedure(ctx: &MemberContext, body: &BatchBody) -> Vec<String> {
	let mut w = PyWriter::new();
	open_member(&mut w, &batch_name(ctx), &["parmlist".to_owned()], &batch_doc(ctx));
	let binders = match body {
		BatchBody::OutputArrays => {
			w.line("# out and in/out array parameters cannot be bound per row");
			w.line(&RuntimeFailure::OutputArrays.raise_statement());
			return close_member(w);
		},
		BatchBody::Vectorized(binders) => binders,
	};

	let parameters = &ctx.routine.parameters;
	let template = CallTemplate::new(ctx.call_target(), parameters);
	w.line("arguments = []");
	w.line("for i in range(len(parmlist)):").indent();
	w.line("binds = {}");
	for (column, (param, marker)) in parameters.iter().zip(template.markers()).enumerate() {
		let value = format!("parmlist[i][{}]", column);
		let bound = match binders.iter().find(|b| b.position == param.position) {
			Some(b) => format!("self.curs.arrayvar({}, {})", b.element.python_name(), value),
			None => value,
		};
		w.line(&format!("binds[{}] = {}", py_string(&marker.key(), '\''), bound));
	}
	w.line("arguments.append(binds)").dedent();
	w.line(&format!("self.curs.executemany({}, arguments)", py_string(&template.to_string(), '"')));
	write_autocommit(&mut w);
	close_member(w)
}

/// A member whose only behavior is to raise `failure`
pub(super) fn unsupported(ctx: &MemberContext, vectorized: bool, failure: &RuntimeFailure) -> Vec<String> {
	let mut w = PyWriter::new();
	if vectorized {
		open_member(&mut w, &batch_name(ctx), &["parmlist".to_owned()], &batch_doc(ctx));
	} else {
		open_member(&mut w, &ctx.member_name(), &ctx.parameter_names(), &ctx.doc_lines());
	}
	w.line(&failure.raise_statement());
	close_member(w)
}
