//! A simple model of the stored-procedure catalog of one package

use std::collections::BTreeMap;

/// Canonical identity of a requested package, resolved once per package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
	/// Owning schema; `None` when queries scope to the session schema
	pub owner: Option<String>,
	pub canonical_name: String,
	/// Object part of the name as the caller asked for it (upper-cased)
	pub requested_name: String,
	/// Schema part of the name as the caller asked for it, if it was qualified
	pub requested_schema: Option<String>,
	pub session_user: String,
	pub is_synonym: bool,
}

impl PackageIdentity {
	/// Name of the generated class: the requested name capitalized like Python's `str.capitalize`
	pub fn class_name(&self) -> String {
		capitalize(&self.requested_name)
	}

	/// `OWNER.PACKAGE` when the owner is known, `PACKAGE` otherwise
	pub fn qualified_name(&self) -> String {
		match &self.owner {
			Some(owner) => format!("{}.{}", owner, self.canonical_name),
			None => self.canonical_name.clone(),
		}
	}

	/// How the class docstring names the package it wraps
	pub fn display_name(&self) -> String {
		if self.is_synonym {
			let schema = self.requested_schema.as_ref().unwrap_or(&self.session_user);
			format!("(synonym) {}.{}", schema, self.requested_name)
		} else {
			format!("{}.{}", self.owner.as_ref().unwrap_or(&self.session_user), self.canonical_name)
		}
	}
}

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
		None => String::new(),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
	Function,
	Procedure,
}

impl RoutineKind {
	pub fn as_str(self) -> &'static str {
		match self {
			RoutineKind::Function => "function",
			RoutineKind::Procedure => "procedure",
		}
	}
}

/// `all_arguments.in_out`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
	In,
	Out,
	InOut,
}

impl ParameterDirection {
	pub fn from_catalog(s: &str) -> ParameterDirection {
		match s.trim() {
			"OUT" => ParameterDirection::Out,
			"IN/OUT" => ParameterDirection::InOut,
			_ => ParameterDirection::In,
		}
	}

	pub fn is_output(self) -> bool {
		self != ParameterDirection::In
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
	/// lower-cased argument name
	pub name: String,
	/// 1-based catalog position
	pub position: u32,
	pub catalog_type: String,
	pub direction: ParameterDirection,
	/// Element type of a `PL/SQL TABLE` parameter
	pub element_type: Option<String>,
}

impl ParameterDescriptor {
	pub fn is_array_type(&self) -> bool {
		self.element_type.is_some()
	}
}

/// Everything the classifier needs to know about one routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDescriptor {
	pub name: String,
	pub kind: RoutineKind,
	/// ordered by position
	pub parameters: Vec<ParameterDescriptor>,
	pub has_output_array_param: bool,
	/// Catalog return type, functions only
	pub return_type: Option<String>,
}

impl RoutineDescriptor {
	pub fn member_name(&self) -> String {
		self.name.to_lowercase()
	}

	pub fn array_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
		self.parameters.iter().filter(|p| p.is_array_type())
	}
}

/// Documentation scanned out of a package's source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocIndex {
	pub package_doc: String,
	/// keyed by lower-cased routine name
	pub routine_docs: BTreeMap<String, String>,
}

impl DocIndex {
	pub fn routine_doc(&self, routine: &str) -> Option<&str> {
		self.routine_docs.get(&routine.to_lowercase()).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn identity(owner: &str, canonical: &str, requested: &str, session: &str) -> PackageIdentity {
		PackageIdentity {
			owner: Some(owner.into()),
			canonical_name: canonical.into(),
			requested_name: requested.into(),
			requested_schema: None,
			session_user: session.into(),
			is_synonym: owner != session || canonical != requested,
		}
	}

	#[test]
	fn class_name_capitalizes_like_python() {
		assert_eq!(identity("APP", "KEYWORD", "KEYWORD", "APP").class_name(), "Keyword");
		assert_eq!(identity("APP", "MY_PKG", "MY_PKG", "APP").class_name(), "My_pkg");
	}

	#[test]
	fn synonyms_are_displayed_under_the_session_schema() {
		let own = identity("APP", "KEYWORD", "KEYWORD", "APP");
		assert_eq!(own.display_name(), "APP.KEYWORD");
		let syn = identity("LIB", "KEYWORD_IMPL", "KW", "APP");
		assert_eq!(syn.display_name(), "(synonym) APP.KW");
		assert_eq!(syn.qualified_name(), "LIB.KEYWORD_IMPL");
		assert_eq!(syn.class_name(), "Kw");
	}

	#[test]
	fn direction_parsing() {
		assert_eq!(ParameterDirection::from_catalog("IN/OUT"), ParameterDirection::InOut);
		assert!(ParameterDirection::from_catalog("OUT").is_output());
		assert!(!ParameterDirection::from_catalog("IN").is_output());
	}
}
