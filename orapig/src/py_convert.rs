//! Renders classified routines as Python (cx_Oracle) source
//!
//! Every function here is pure: the catalog has already been read, and the output for a given input is always the same text
//!
//! ```python
//! import cx_Oracle
//!
//! class Keyword:
//!     """
//!     class Keyword -- interface for package APP.KEYWORD
//!     ...
//!     """
//!
//!     #------------------------------------------------------
//!     def __init__(self, curs):
//!         ...
//!
//!     #------------------------------------------------------
//!     def add(self, id, word):
//!         ...
//!
//!     #------------------------------------------------------
//!     def add_V(self, parmlist):
//!         ...
//! ```
use super::{
	classify::RoutinePlan,
	doc_extract::reindent,
	sql_tree::{PackageIdentity, RoutineDescriptor},
};

mod call_template;
mod routines;

pub use call_template::{BindMarker, CallTemplate};

const INDENT: &str = "    ";
const MEMBER_RULE: &str = "#------------------------------------------------------";

pub const FILE_PREAMBLE: [&str; 2] = ["import cx_Oracle", ""];
pub const FILE_TRAILER: [&str; 1] = [""];

const PYTHON_KEYWORDS: [&str; 38] = [
	"False",
	"None",
	"True",
	"and",
	"as",
	"assert",
	"async",
	"await",
	"break",
	"class",
	"continue",
	"def",
	"del",
	"elif",
	"else",
	"except",
	"exec",
	"finally",
	"for",
	"from",
	"global",
	"if",
	"import",
	"in",
	"is",
	"lambda",
	"nonlocal",
	"not",
	"or",
	"pass",
	"print",
	"raise",
	"return",
	"try",
	"while",
	"with",
	"yield",
	"self",
];

/// Failures compiled into generated members, raised when the member is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeFailure {
	UnsupportedType(String),
	OutputArrays,
}

impl RuntimeFailure {
	pub fn raise_statement(&self) -> String {
		match self {
			RuntimeFailure::UnsupportedType(catalog_type) => format!(
				"raise TypeError({})",
				py_string(&format!("Unsupported Oracle Data Type: {}", catalog_type), '"')
			),
			RuntimeFailure::OutputArrays => {
				format!("raise NotImplementedError({})", py_string("Out array parameters not supported", '\''))
			},
		}
	}
}

/// Line buffer with a current indentation level
#[derive(Debug, Default)]
pub struct PyWriter {
	lines: Vec<String>,
	level: usize,
}

impl PyWriter {
	pub fn new() -> PyWriter {
		PyWriter::default()
	}

	pub fn line(&mut self, text: &str) -> &mut Self {
		if text.is_empty() {
			self.lines.push(String::new());
		} else {
			self.lines.push(format!("{}{}", INDENT.repeat(self.level), text));
		}
		self
	}

	pub fn blank(&mut self) -> &mut Self {
		self.lines.push(String::new());
		self
	}

	/// Appends already indented text verbatim, one entry per line
	pub fn raw(&mut self, text: &str) -> &mut Self {
		self.lines.extend(text.lines().map(str::to_owned));
		self
	}

	pub fn indent(&mut self) -> &mut Self {
		self.level += 1;
		self
	}

	pub fn dedent(&mut self) -> &mut Self {
		self.level = self.level.saturating_sub(1);
		self
	}

	pub fn into_lines(self) -> Vec<String> {
		self.lines
	}
}

/// Turns a catalog name into a Python identifier
///
/// Lower-cases, replaces characters Python does not allow (`$`, `#`) with `_`, and appends `_` to keywords
pub fn py_ident(name: &str) -> String {
	let mut ident: String = name
		.to_lowercase()
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
		.collect();
	if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
		ident.insert(0, '_');
	}
	if PYTHON_KEYWORDS.iter().any(|&keyword| keyword == ident) {
		ident.push('_');
	}
	ident
}

/// A Python string literal delimited by `quote`
pub fn py_string(value: &str, quote: char) -> String {
	let mut ret = String::with_capacity(value.len() + 2);
	ret.push(quote);
	for c in value.chars() {
		if c == '\\' || c == quote {
			ret.push('\\');
		}
		ret.push(c);
	}
	ret.push(quote);
	ret
}

/// Makes text safe to place between triple quotes
pub fn escape_docstring(text: &str) -> String {
	text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// The class statement, its docstring and constructor
pub fn class_header(identity: &PackageIdentity, package_doc: &str) -> Vec<String> {
	let class_name = py_ident_class(&identity.class_name());
	let mut doc = format!(
		"class {} -- interface for package {}\n\n*** This is a generated class. DO NOT MODIFY! ***\n",
		class_name,
		identity.display_name()
	);
	if !package_doc.trim().is_empty() {
		doc.push('\n');
		doc.push_str(&escape_docstring(package_doc));
	}

	let mut w = PyWriter::new();
	w.line(&format!("class {}:", class_name)).indent();
	w.line("\"\"\"").raw(&reindent(&doc, 1)).line("\"\"\"");
	w.blank();
	w.line(MEMBER_RULE);
	w.line("def __init__(self, curs):").indent();
	w.line("self.curs = curs")
		.line("# do not set autocommit if you are not")
		.line("# writing an appserver!")
		.line("self.autocommit = False");
	w.blank();
	w.into_lines()
}

/// Class names keep their capitalization, only illegal characters are replaced
fn py_ident_class(name: &str) -> String {
	let ident = py_ident(name);
	let mut chars = ident.chars();
	match chars.next() {
		Some('_') if !name.starts_with('_') => ident,
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => ident,
	}
}

/// Everything a member template closes over besides its plan
#[derive(Debug, Clone, Copy)]
pub struct MemberContext<'a> {
	pub identity: &'a PackageIdentity,
	pub routine: &'a RoutineDescriptor,
	/// Extracted doc, already indented for the member body
	pub doc: Option<&'a str>,
}

impl<'a> MemberContext<'a> {
	/// `OWNER.PACKAGE.ROUTINE`, the name the generated code calls
	pub fn call_target(&self) -> String {
		format!("{}.{}", self.identity.qualified_name(), self.routine.name)
	}

	pub fn member_name(&self) -> String {
		py_ident(&self.routine.member_name())
	}

	/// Signature names in position order, unique even when catalog names escape to the same identifier
	///
	/// A repeated identifier gets its catalog position appended: `P$A`, `P#A` become `p_a`, `p_a_2`
	pub fn parameter_names(&self) -> Vec<String> {
		let mut names: Vec<String> = Vec::with_capacity(self.routine.parameters.len());
		for p in &self.routine.parameters {
			let mut name = py_ident(&p.name);
			if names.contains(&name) {
				name = format!("{}_{}", name, p.position);
			}
			while names.contains(&name) {
				name.push('_');
			}
			names.push(name);
		}
		names
	}

	fn doc_lines(&self) -> String {
		match self.doc.filter(|d| !d.trim().is_empty()) {
			Some(doc) => escape_docstring(doc),
			None => reindent(
				&format!("(No doc string for this {})\n(orapig --helpfmt for more info)", self.routine.kind.as_str()),
				2,
			),
		}
	}
}

/// Renders one member; the match is exhaustive over every plan
pub fn emit_member(plan: &RoutinePlan, ctx: &MemberContext) -> Vec<String> {
	match plan {
		RoutinePlan::ScalarFunction { return_type, binders } => routines::scalar_function(ctx, *return_type, binders),
		RoutinePlan::UnsupportedFunction { catalog_type } => {
			routines::unsupported(ctx, false, &RuntimeFailure::UnsupportedType(catalog_type.clone()))
		},
		RoutinePlan::Procedure { binders } => routines::procedure(ctx, binders),
		RoutinePlan::BatchProcedure { body } => routines::batch_procedure(ctx, body),
		RoutinePlan::UnsupportedProcedure { catalog_type, vectorized } => {
			routines::unsupported(ctx, *vectorized, &RuntimeFailure::UnsupportedType(catalog_type.clone()))
		},
	}
}
