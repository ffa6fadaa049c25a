//! Catalog scalar types to cx_Oracle binding types

use std::collections::HashMap;

/// cx_Oracle type objects a parameter or return value can be bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
	Binary,
	Bfile,
	Blob,
	Clob,
	Cursor,
	Datetime,
	FixedChar,
	Number,
	String,
	Timestamp,
	Rowid,
}

impl BindingType {
	pub fn tag(self) -> &'static str {
		use BindingType::*;
		match self {
			Binary    => "BINARY",
			Bfile     => "BFILE",
			Blob      => "BLOB",
			Clob      => "CLOB",
			Cursor    => "CURSOR",
			Datetime  => "DATETIME",
			FixedChar => "FIXED_CHAR",
			Number    => "NUMBER",
			String    => "STRING",
			Timestamp => "TIMESTAMP",
			Rowid     => "ROWID",
		}
	}

	/// The expression naming this type in generated code, e.g. `cx_Oracle.STRING`
	pub fn python_name(self) -> std::string::String {
		format!("cx_Oracle.{}", self.tag())
	}
}

/// Fixed lookup table, built once and shared by reference
///
/// A missing key is the normal answer for a type with no binding, callers branch on the `Option`
#[derive(Debug, Clone)]
pub struct TypeMapping {
	table: HashMap<&'static str, BindingType>,
}

impl TypeMapping {
	pub fn oracle() -> TypeMapping {
		use BindingType::*;
		let table = [
			("RAW",        Binary),
			("BFILE",      Bfile),
			("BLOB",       Blob),
			("CLOB",       Clob),
			("REF CURSOR", Cursor),
			("DATE",       Datetime),
			("CHAR",       FixedChar),
			("NUMBER",     Number),
			("FLOAT",      Number),
			("VARCHAR2",   String),
			("TIMESTAMP",  Timestamp),
			("ROWID",      Rowid),
			("CURSOR",     Cursor),
		]
		.iter()
		.copied()
		.collect();
		TypeMapping { table }
	}

	pub fn map(&self, catalog_type: &str) -> Option<BindingType> {
		self.table.get(catalog_type).copied()
	}
}

impl Default for TypeMapping {
	fn default() -> TypeMapping {
		TypeMapping::oracle()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonical_entries() {
		let m = TypeMapping::oracle();
		assert_eq!(m.map("VARCHAR2"), Some(BindingType::String));
		assert_eq!(m.map("REF CURSOR"), Some(BindingType::Cursor));
		assert_eq!(m.map("FLOAT").map(BindingType::tag), Some("NUMBER"));
		assert_eq!(m.map("DATE").unwrap().python_name(), "cx_Oracle.DATETIME");
	}

	#[test]
	fn unmapped_types_are_absent() {
		let m = TypeMapping::oracle();
		for t in &["OBJECT", "NCLOB", "LONG", "PL/SQL TABLE", "varchar2", ""] {
			assert_eq!(m.map(t), None, "{}", t);
		}
	}
}
