//! In-memory stand-in for the Oracle data dictionary
#![allow(dead_code)]

use orapig::catalog_select_types::*;
use orapig_core::{QueryExecutor, Row, RowCursor, SqlError, Value};

pub struct FakeParam {
	pub name: &'static str,
	pub data_type: &'static str,
	pub in_out: &'static str,
	pub element: Option<&'static str>,
}

pub fn param(name: &'static str, data_type: &'static str) -> FakeParam {
	FakeParam {
		name,
		data_type,
		in_out: "IN",
		element: None,
	}
}

pub fn table_param(name: &'static str, element: &'static str, in_out: &'static str) -> FakeParam {
	FakeParam {
		name,
		data_type: "PL/SQL TABLE",
		in_out,
		element: Some(element),
	}
}

pub struct FakeRoutine {
	pub name: &'static str,
	pub return_type: Option<&'static str>,
	pub params: Vec<FakeParam>,
}

pub fn procedure(name: &'static str, params: Vec<FakeParam>) -> FakeRoutine {
	FakeRoutine {
		name,
		return_type: None,
		params,
	}
}

pub fn function(name: &'static str, return_type: &'static str, params: Vec<FakeParam>) -> FakeRoutine {
	FakeRoutine {
		name,
		return_type: Some(return_type),
		params,
	}
}

pub struct FakePackage {
	pub owner: &'static str,
	pub name: &'static str,
	pub source: &'static str,
	pub routines: Vec<FakeRoutine>,
}

pub struct FakeSynonym {
	/// `PUBLIC` for public synonyms
	pub owner: &'static str,
	pub name: &'static str,
	pub target_owner: &'static str,
	pub target_name: &'static str,
	pub db_link: Option<&'static str>,
}

#[derive(Default)]
pub struct FakeCatalog {
	pub session_user: &'static str,
	pub packages: Vec<FakePackage>,
	pub synonyms: Vec<FakeSynonym>,
	/// Every statement executed, in order
	pub executed: Vec<String>,
	/// Statements answered with no rows at all
	pub empty: Vec<&'static str>,
}

impl FakeCatalog {
	pub fn new(session_user: &'static str) -> FakeCatalog {
		FakeCatalog {
			session_user,
			..FakeCatalog::default()
		}
	}

	pub fn with_package(mut self, package: FakePackage) -> FakeCatalog {
		self.packages.push(package);
		self
	}

	pub fn with_synonym(mut self, synonym: FakeSynonym) -> FakeCatalog {
		self.synonyms.push(synonym);
		self
	}

	pub fn without_rows(mut self, sql: &'static str) -> FakeCatalog {
		self.empty.push(sql);
		self
	}

	fn owner(&self, params: &[(&str, Value)]) -> String {
		bound(params, "owner").unwrap_or_else(|| self.session_user.to_owned())
	}

	fn package(&self, params: &[(&str, Value)]) -> Option<&FakePackage> {
		let owner = self.owner(params);
		let name = bound(params, "package_name")?;
		self.packages.iter().find(|p| p.owner == owner && p.name == name)
	}

	fn routine(&self, params: &[(&str, Value)]) -> Option<&FakeRoutine> {
		let name = bound(params, "object_name")?;
		self.package(params)?.routines.iter().find(|r| r.name == name)
	}

	fn resolve(&self, params: &[(&str, Value)]) -> Vec<Row> {
		let name = bound(params, "name").unwrap_or_default();
		let schema = bound(params, "schema");
		let target_schema = schema.clone().unwrap_or_else(|| self.session_user.to_owned());
		let mut rows = Vec::new();
		for p in self.packages.iter().filter(|p| p.name == name && p.owner == target_schema) {
			rows.push(resolved(p.owner, p.name, None, 1));
		}
		for s in self.synonyms.iter().filter(|s| s.name == name && s.owner == target_schema) {
			rows.push(resolved(s.target_owner, s.target_name, s.db_link, 2));
		}
		if schema.is_none() {
			for s in self.synonyms.iter().filter(|s| s.name == name && s.owner == "PUBLIC") {
				rows.push(resolved(s.target_owner, s.target_name, s.db_link, 3));
			}
		}
		rows
	}

	fn answer(&self, sql: &str, params: &[(&str, Value)]) -> Vec<Row> {
		let routine = || self.routine(params);
		if sql == GET_SESSION_USER {
			vec![Row::new(vec![self.session_user.into()])]
		} else if sql == RESOLVE_PACKAGE {
			self.resolve(params)
		} else if sql == COUNT_PACKAGES {
			count(self.package(params).is_some() as i64)
		} else if sql == GET_ROUTINE_NAMES {
			let mut names: Vec<&str> = self.package(params).map_or(vec![], |p| p.routines.iter().map(|r| r.name).collect());
			names.sort();
			names.dedup();
			names.into_iter().map(|n| Row::new(vec![n.into()])).collect()
		} else if sql == COUNT_RETURN_VALUES {
			count(routine().map_or(0, |r| r.return_type.is_some() as i64))
		} else if sql == GET_RETURN_TYPE {
			routine()
				.and_then(|r| r.return_type)
				.map(|t| vec![Row::new(vec![t.into()])])
				.unwrap_or_default()
		} else if sql == GET_PARAMETERS {
			routine().map_or(vec![], |r| {
				r.params
					.iter()
					.enumerate()
					.map(|(i, p)| {
						Row::new(vec![
							p.name.to_uppercase().into(),
							Value::Int(i as i64 + 1),
							p.data_type.into(),
							p.in_out.into(),
							p.element.into(),
						])
					})
					.collect()
			})
		} else if sql == COUNT_OUTPUT_ARRAYS {
			count(routine().map_or(0, |r| {
				r.params.iter().filter(|p| p.element.is_some() && p.in_out != "IN").count() as i64
			}))
		} else if sql == GET_PACKAGE_SOURCE {
			self.package(params)
				.map_or(vec![], |p| p.source.lines().map(|l| Row::new(vec![l.into()])).collect())
		} else {
			panic!("unexpected statement: {}", sql)
		}
	}
}

impl QueryExecutor for FakeCatalog {
	fn execute(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<RowCursor, SqlError> {
		self.executed.push(sql.to_owned());
		if self.empty.contains(&sql) {
			return Ok(RowCursor::new(vec![]));
		}
		Ok(RowCursor::new(self.answer(sql, params)))
	}
}

fn bound(params: &[(&str, Value)], name: &str) -> Option<String> {
	params
		.iter()
		.find(|(n, _)| *n == name)
		.and_then(|(_, v)| v.as_text())
		.map(str::to_owned)
}

fn count(n: i64) -> Vec<Row> {
	vec![Row::new(vec![Value::Int(n)])]
}

fn resolved(owner: &str, name: &str, db_link: Option<&str>, precedence: i64) -> Row {
	Row::new(vec![owner.into(), name.into(), db_link.into(), Value::Int(precedence)])
}

pub const KEYWORD_SOURCE: &str = "PACKAGE keyword
--+ Keywords attached to assets.
AS
    --+ Attach word to asset id.
    PROCEDURE add(id NUMBER, word VARCHAR2);

    FUNCTION all_words RETURN sys_refcursor;
END keyword;
";

pub fn keyword_package(owner: &'static str) -> FakePackage {
	FakePackage {
		owner,
		name: "KEYWORD",
		source: KEYWORD_SOURCE,
		routines: vec![
			procedure("ADD", vec![param("id", "NUMBER"), param("word", "VARCHAR2")]),
			function("ALL_WORDS", "REF CURSOR", vec![]),
		],
	}
}
