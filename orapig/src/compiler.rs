//! Drives the pipeline over a list of package names
use super::{
	classify::classify,
	doc_extract::DocExtractor,
	error::{CompileError, Result},
	introspect::{CatalogScope, SchemaIntrospector},
	py_convert::{class_header, emit_member, MemberContext, FILE_PREAMBLE, FILE_TRAILER},
	sql_tree::RoutineKind,
	type_map::TypeMapping,
};
use orapig_core::{QueryExecutor, Sink};
use std::{fmt, io, str::FromStr};

/// Printed by `--helpfmt`
pub const HELP_FMT: &str = "\
orapig reads documentation for the generated classes out of the package source.

Lines of the form

    --+ some text

that appear before the AS (or IS) line of the package become the class
docstring. After it, a run of such lines documents the next FUNCTION or
PROCEDURE declaration and becomes the docstring of its generated method.
\"-- + some text\" is accepted as well. Routines with no doc lines get a
placeholder docstring.

    CREATE OR REPLACE PACKAGE keyword
    --+ Keywords attached to assets.
    AS
        --+ Attach word to the asset id.
        PROCEDURE add(id NUMBER, word VARCHAR2);
    END keyword;
";

/// Output language selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	Python,
	Cxx,
	Ruby,
}

impl Default for Target {
	fn default() -> Target {
		Target::Python
	}
}

impl FromStr for Target {
	type Err = CompileError;

	fn from_str(s: &str) -> Result<Target> {
		match s.trim().to_lowercase().as_str() {
			"python" | "py" => Ok(Target::Python),
			"cxx" => Ok(Target::Cxx),
			"rb" => Ok(Target::Ruby),
			other => Err(CompileError::UnsupportedTarget(other.to_owned())),
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Target::Python => "python",
			Target::Cxx => "cxx",
			Target::Ruby => "rb",
		})
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
	pub scope: CatalogScope,
	pub target: Target,
}

/// The complete text of one run, written to a [`Sink`] only once it is finished
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedUnit {
	lines: Vec<String>,
}

impl GeneratedUnit {
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	pub fn write_to<S: Sink>(&self, sink: &mut S) -> io::Result<()> {
		for line in &self.lines {
			sink.write_line(line)?;
		}
		Ok(())
	}
}

impl fmt::Display for GeneratedUnit {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for line in &self.lines {
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}

pub struct Compiler<E: QueryExecutor> {
	executor: E,
	options: CompileOptions,
	mapping: TypeMapping,
}

impl<E: QueryExecutor> Compiler<E> {
	/// Fails for targets other than Python
	pub fn new(executor: E, options: CompileOptions) -> Result<Compiler<E>> {
		if options.target != Target::Python {
			return Err(CompileError::UnsupportedTarget(options.target.to_string()));
		}
		Ok(Compiler {
			executor,
			options,
			mapping: TypeMapping::oracle(),
		})
	}

	/// One module holding a class per package, in the order given
	///
	/// Nothing is returned unless every package compiles
	pub fn render<S: AsRef<str>>(&mut self, packages: &[S]) -> Result<GeneratedUnit> {
		let mut lines: Vec<String> = FILE_PREAMBLE.iter().map(|&l| l.to_owned()).collect();
		for package in packages {
			lines.extend(self.render_class(package.as_ref())?);
		}
		lines.extend(FILE_TRAILER.iter().map(|&l| l.to_owned()));
		Ok(GeneratedUnit { lines })
	}

	/// A module holding the single class for `package`
	pub fn render_package(&mut self, package: &str) -> Result<GeneratedUnit> {
		self.render(&[package])
	}

	pub fn compile<S: AsRef<str>, K: Sink>(&mut self, packages: &[S], sink: &mut K) -> Result<()> {
		let unit = self.render(packages)?;
		unit.write_to(sink)?;
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	fn render_class(&mut self, requested: &str) -> Result<Vec<String>> {
		let scope = self.options.scope;
		let identity = {
			let mut introspector = SchemaIntrospector::new(&mut self.executor, scope);
			let identity = introspector.resolve_identity(requested)?;
			if !introspector.package_exists(&identity)? {
				return Err(CompileError::PackageNotFound(requested.to_owned()));
			}
			identity
		};
		let docs = DocExtractor::extract(&mut self.executor, &identity)?;
		let mut lines = class_header(&identity, &docs.package_doc);

		let mut introspector = SchemaIntrospector::new(&mut self.executor, scope);
		let routines = introspector.list_routines(&identity)?;
		for routine in &routines {
			let descriptor = introspector.describe_routine(&identity, routine)?;
			let ctx = MemberContext {
				identity: &identity,
				routine: &descriptor,
				doc: docs.routine_doc(routine),
			};
			for plan in classify(&descriptor, &self.mapping) {
				if plan.is_stub() {
					tracing::warn!(routine = %routine, plan = plan.label(), "generated member always raises");
				} else {
					tracing::debug!(routine = %routine, plan = plan.label(), "classified");
				}
				lines.extend(emit_member(&plan, &ctx));
			}
		}
		tracing::info!(package = %identity.qualified_name(), routines = routines.len(), "generated class");
		Ok(lines)
	}

	/// Lists what the catalog says about each package, for debugging
	///
	/// A package that does not exist is reported and skipped
	pub fn dump<S: AsRef<str>>(&mut self, packages: &[S]) -> Result<GeneratedUnit> {
		let mut lines = Vec::new();
		let mut introspector = SchemaIntrospector::new(&mut self.executor, self.options.scope);
		for package in packages {
			let package = package.as_ref();
			lines.push(format!("package: {}", package.trim().to_uppercase()));
			let identity = match introspector.resolve_identity(package) {
				Ok(identity) => Some(identity),
				Err(CompileError::NameResolution { reason, .. }) => {
					tracing::warn!(package, %reason, "not resolved");
					None
				},
				Err(e) => return Err(e),
			};
			let identity = match identity {
				Some(identity) if introspector.package_exists(&identity)? => identity,
				_ => {
					lines.push("    DOES NOT EXIST IN SCHEMA".to_owned());
					continue;
				},
			};
			for routine in introspector.list_routines(&identity)? {
				let descriptor = introspector.describe_routine(&identity, &routine)?;
				match descriptor.kind {
					RoutineKind::Function => {
						lines.push(format!("    func: {}", descriptor.name));
						lines.push(format!("        type: {}", descriptor.return_type.as_deref().unwrap_or_default()));
					},
					RoutineKind::Procedure => lines.push(format!("    proc: {}", descriptor.name)),
				}
				for p in &descriptor.parameters {
					match &p.element_type {
						Some(element) => lines.push(format!("        parm: {} {} OF {}", p.name, p.catalog_type, element)),
						None => lines.push(format!("        parm: {} {}", p.name, p.catalog_type)),
					}
				}
			}
		}
		Ok(GeneratedUnit { lines })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn target_selectors() {
		assert_eq!("python".parse::<Target>().unwrap(), Target::Python);
		assert_eq!("PY".parse::<Target>().unwrap(), Target::Python);
		assert_eq!("cxx".parse::<Target>().unwrap(), Target::Cxx);
		assert_eq!("rb".parse::<Target>().unwrap(), Target::Ruby);
		assert!(matches!("java".parse::<Target>(), Err(CompileError::UnsupportedTarget(t)) if t == "java"));
	}

	#[test]
	fn unit_display_ends_every_line() {
		let unit = GeneratedUnit {
			lines: vec!["import cx_Oracle".into(), "".into()],
		};
		assert_eq!(unit.to_string(), "import cx_Oracle\n\n");
		let mut sink: Vec<String> = Vec::new();
		unit.write_to(&mut sink).unwrap();
		assert_eq!(sink, unit.lines());
	}
}
