//! [`QueryExecutor`] over a postgres session
//!
//! The catalog statements use Oracle style named binds (`:owner`); the postgres protocol wants positional ones (`$1`), so statements are rewritten before they are sent
//!
//! [`QueryExecutor`]: ../../orapig_core/trait.QueryExecutor.html
use orapig_core::*;
use postgres::{
	types::{FromSql, ToSql, Type},
	Client,
};
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("no value bound for :{0}")]
struct UnboundParameter(String);

#[derive(Debug, Error)]
#[error("malformed numeric value")]
struct MalformedNumeric;

pub struct PgExecutor {
	client: Client,
}

impl PgExecutor {
	pub fn new(client: Client) -> PgExecutor {
		PgExecutor { client }
	}
}

impl QueryExecutor for PgExecutor {
	fn execute(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<RowCursor, SqlError> {
		let (statement, names) = rewrite_named_binds(sql);
		let binds = names
			.iter()
			.map(|name| {
				params
					.iter()
					.find(|(n, _)| n.eq_ignore_ascii_case(name))
					.map(|(_, v)| to_sql(v))
					.ok_or_else(|| SqlError::driver(UnboundParameter(name.clone())))
			})
			.collect::<Result<Vec<_>, SqlError>>()?;
		let refs: Vec<&(dyn ToSql + Sync)> = binds.iter().map(|b| b.as_ref()).collect();
		tracing::trace!(%statement, binds = refs.len(), "query");

		let rows = self.client.query(statement.as_str(), &refs).map_err(SqlError::driver)?;
		let rows = rows.iter().map(convert_row).collect::<Result<Vec<_>, SqlError>>()?;
		Ok(RowCursor::new(rows))
	}
}

fn to_sql(value: &Value) -> Box<dyn ToSql + Sync> {
	match value {
		Value::Null => Box::new(None::<String>),
		Value::Int(i) => Box::new(*i),
		Value::Text(s) => Box::new(s.clone()),
	}
}

/// How a column of a given postgres type becomes a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decode {
	Int2,
	Int4,
	Int8,
	Oid,
	Bool,
	Numeric,
	Float4,
	Float8,
	Text,
}

fn decoding(ty: &Type) -> Option<Decode> {
	let decode = if *ty == Type::INT2 {
		Decode::Int2
	} else if *ty == Type::INT4 {
		Decode::Int4
	} else if *ty == Type::INT8 {
		Decode::Int8
	} else if *ty == Type::OID {
		Decode::Oid
	} else if *ty == Type::BOOL {
		Decode::Bool
	} else if *ty == Type::NUMERIC {
		Decode::Numeric
	} else if *ty == Type::FLOAT4 {
		Decode::Float4
	} else if *ty == Type::FLOAT8 {
		Decode::Float8
	} else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN].contains(ty) {
		Decode::Text
	} else {
		return None;
	};
	Some(decode)
}

fn get<'a, T: FromSql<'a>>(row: &'a postgres::Row, i: usize) -> Result<Option<T>, SqlError> {
	row.try_get(i).map_err(SqlError::driver)
}

fn convert_row(row: &postgres::Row) -> Result<Row, SqlError> {
	let mut columns = Vec::with_capacity(row.len());
	for (i, column) in row.columns().iter().enumerate() {
		let value = match decoding(column.type_()) {
			Some(Decode::Int2) => Value::from(get::<i16>(row, i)?.map(i64::from)),
			Some(Decode::Int4) => Value::from(get::<i32>(row, i)?.map(i64::from)),
			Some(Decode::Int8) => Value::from(get::<i64>(row, i)?),
			Some(Decode::Oid) => Value::from(get::<u32>(row, i)?.map(i64::from)),
			Some(Decode::Bool) => Value::from(get::<bool>(row, i)?.map(i64::from)),
			Some(Decode::Numeric) => get::<PgNumeric>(row, i)?.map_or(Value::Null, PgNumeric::into_value),
			Some(Decode::Float4) => Value::from(get::<f32>(row, i)?.map(|f| f.to_string())),
			Some(Decode::Float8) => Value::from(get::<f64>(row, i)?.map(|f| f.to_string())),
			Some(Decode::Text) => Value::from(get::<String>(row, i)?),
			None => {
				tracing::debug!(column = column.name(), ty = %column.type_(), "no decoding for column type");
				return Err(SqlError::WrongType {
					index: i,
					expected: "a scalar catalog column",
					found: "an unsupported postgres type",
				});
			},
		};
		columns.push(value);
	}
	Ok(Row::new(columns))
}

/// A `NUMERIC` column in decimal notation
#[derive(Debug, Clone, PartialEq, Eq)]
struct PgNumeric(String);

impl PgNumeric {
	/// Whole numbers that fit become [`Value::Int`], anything else stays text
	fn into_value(self) -> Value {
		let whole = match self.0.find('.') {
			Some(dot) if self.0[dot + 1..].bytes().all(|b| b == b'0') => &self.0[..dot],
			Some(_) => return Value::Text(self.0),
			None => self.0.as_str(),
		};
		match whole.parse::<i64>() {
			Ok(n) => Value::Int(n),
			Err(_) => Value::Text(self.0),
		}
	}

	/// Binary layout: digit count, weight, sign, display scale, then base 10000 digits, all big endian
	fn decode(raw: &[u8]) -> Result<PgNumeric, MalformedNumeric> {
		let word = |at: usize| raw.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]])).ok_or(MalformedNumeric);
		let ndigits = word(0)? as usize;
		let weight = word(2)? as i16 as i32;
		let sign = word(4)?;
		let scale = word(6)? as usize;
		let digits = (0..ndigits).map(|d| word(8 + 2 * d)).collect::<Result<Vec<u16>, _>>()?;
		let digit = |i: i32| if i < 0 { 0 } else { digits.get(i as usize).copied().unwrap_or(0) };

		let mut text = match sign {
			0x0000 => String::new(),
			0x4000 => "-".to_owned(),
			0xC000 => return Ok(PgNumeric("NaN".to_owned())),
			_ => return Err(MalformedNumeric),
		};
		if weight < 0 {
			text.push('0');
		} else {
			text.push_str(&digit(0).to_string());
			for i in 1..=weight {
				text.push_str(&format!("{:04}", digit(i)));
			}
		}
		if scale > 0 {
			let mut fraction = String::new();
			let mut i = weight + 1;
			while fraction.len() < scale {
				fraction.push_str(&format!("{:04}", digit(i)));
				i += 1;
			}
			fraction.truncate(scale);
			text.push('.');
			text.push_str(&fraction);
		}
		Ok(PgNumeric(text))
	}
}

impl<'a> FromSql<'a> for PgNumeric {
	fn from_sql(_: &Type, raw: &'a [u8]) -> Result<PgNumeric, Box<dyn StdError + Sync + Send>> {
		Ok(PgNumeric::decode(raw)?)
	}

	fn accepts(ty: &Type) -> bool {
		*ty == Type::NUMERIC
	}
}

/// Replaces `:name` binds with `$n`, numbering names in order of first use
///
/// Quoted text and `::` casts are left alone. Returns the statement and the bind names, index `n - 1` holding the name of `$n`
pub fn rewrite_named_binds(sql: &str) -> (String, Vec<String>) {
	let mut out = String::with_capacity(sql.len());
	let mut names: Vec<String> = Vec::new();
	let mut chars = sql.chars().peekable();
	let mut quote: Option<char> = None;

	while let Some(c) = chars.next() {
		if let Some(q) = quote {
			out.push(c);
			if c == q {
				quote = None;
			}
			continue;
		}
		match c {
			'\'' | '"' => {
				quote = Some(c);
				out.push(c);
			},
			':' if chars.peek() == Some(&':') => {
				out.push_str("::");
				chars.next();
			},
			':' if chars.peek().map_or(false, |n| n.is_ascii_alphabetic() || *n == '_') => {
				let mut name = String::new();
				while let Some(&n) = chars.peek() {
					if n.is_ascii_alphanumeric() || n == '_' {
						name.push(n);
						chars.next();
					} else {
						break;
					}
				}
				let name = name.to_lowercase();
				let index = match names.iter().position(|n| *n == name) {
					Some(i) => i + 1,
					None => {
						names.push(name);
						names.len()
					},
				};
				out.push('$');
				out.push_str(&index.to_string());
			},
			_ => out.push(c),
		}
	}
	(out, names)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn binds_become_positional() {
		let (sql, names) = rewrite_named_binds("SELECT 1 WHERE a = :owner AND b = :package_name AND c = :OWNER");
		assert_eq!(sql, "SELECT 1 WHERE a = $1 AND b = $2 AND c = $1");
		assert_eq!(names, vec!["owner", "package_name"]);
	}

	#[test]
	fn literals_and_casts_are_untouched() {
		let (sql, names) = rewrite_named_binds("SELECT ':x', \":y\", n::text FROM t WHERE z = :z");
		assert_eq!(sql, "SELECT ':x', \":y\", n::text FROM t WHERE z = $1");
		assert_eq!(names, vec!["z"]);
	}

	#[test]
	fn catalog_statements_bind_every_name() {
		use crate::catalog_select_types::*;
		for statement in &[GET_PARAMETERS, COUNT_OUTPUT_ARRAYS, RESOLVE_PACKAGE, GET_PACKAGE_SOURCE] {
			let (sql, names) = rewrite_named_binds(statement);
			assert!(!sql.contains(" :"), "{}", sql);
			assert!(!names.is_empty());
		}
		assert_eq!(rewrite_named_binds(RESOLVE_PACKAGE).1, vec!["name", "schema"]);
	}

	fn numeric(ndigits: u16, weight: i16, sign: u16, scale: u16, digits: &[u16]) -> Vec<u8> {
		let mut raw = Vec::new();
		for word in [ndigits, weight as u16, sign, scale].iter().chain(digits) {
			raw.extend_from_slice(&word.to_be_bytes());
		}
		raw
	}

	#[test]
	fn column_types_have_a_decoding() {
		assert_eq!(decoding(&Type::INT4), Some(Decode::Int4));
		assert_eq!(decoding(&Type::NUMERIC), Some(Decode::Numeric));
		assert_eq!(decoding(&Type::BOOL), Some(Decode::Bool));
		assert_eq!(decoding(&Type::FLOAT8), Some(Decode::Float8));
		assert_eq!(decoding(&Type::VARCHAR), Some(Decode::Text));
		assert_eq!(decoding(&Type::NAME), Some(Decode::Text));
		assert_eq!(decoding(&Type::BYTEA), None);
		assert_eq!(decoding(&Type::TIMESTAMP), None);
	}

	#[test]
	fn numeric_columns_decode() {
		let decode = |raw: Vec<u8>| PgNumeric::decode(&raw).unwrap().0;
		assert_eq!(decode(numeric(1, 0, 0, 0, &[7])), "7");
		assert_eq!(decode(numeric(0, 0, 0, 0, &[])), "0");
		assert_eq!(decode(numeric(1, 1, 0x4000, 0, &[2])), "-20000");
		assert_eq!(decode(numeric(3, 1, 0, 2, &[1, 2345, 6700])), "12345.67");
		assert_eq!(decode(numeric(1, -1, 0, 2, &[500])), "0.05");
		assert_eq!(decode(numeric(0, 0, 0xC000, 0, &[])), "NaN");
		assert!(PgNumeric::decode(&[0, 1, 0]).is_err());
		assert!(PgNumeric::decode(&numeric(1, 0, 0x1234, 0, &[1])).is_err());
	}

	#[test]
	fn whole_numerics_become_integers() {
		assert_eq!(PgNumeric("42".into()).into_value(), Value::Int(42));
		assert_eq!(PgNumeric("-3.00".into()).into_value(), Value::Int(-3));
		assert_eq!(PgNumeric("2.5".into()).into_value(), Value::Text("2.5".into()));
		assert_eq!(PgNumeric("99999999999999999999".into()).into_value(), Value::Text("99999999999999999999".into()));
	}
}
