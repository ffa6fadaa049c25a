#![forbid(unsafe_code)]
//! Capabilities the orapig interface compiler needs from its surroundings
//!
//! Provides the [`QueryExecutor`] trait (run a catalog query with named binds and iterate the rows) and the [`Sink`] trait (append a line of generated text)
//!
//! Rows come back as a [`Row`] of loosely typed [`Value`]s; the [`TryFromRow`] trait (derivable with `#[derive(TryFromRow)]`) converts them into typed structs
//!
//! [`QueryExecutor`]: ./trait.QueryExecutor.html
//! [`Sink`]: ./trait.Sink.html
//! [`Row`]: ./struct.Row.html
//! [`Value`]: ./enum.Value.html
//! [`TryFromRow`]: ./trait.TryFromRow.html

// lets the derive macro's `::orapig_core` paths resolve inside this crate too
extern crate self as orapig_core;

//reexports
pub use orapig_derive::*;

/// Implementation of `TryFromRow` for various types
mod try_from_row;
pub use try_from_row::{FromValue, TryFromRow};

mod sink;
pub use sink::{Sink, WriteSink};

use std::fmt;

/// Errors raised while querying the catalog or decoding its rows
#[derive(Debug, thiserror::Error)]
pub enum SqlError {
	/// The underlying driver failed
	#[error("database error: {0}")]
	Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
	#[error("row has no column {index} (it has {len})")]
	MissingColumn { index: usize, len: usize },
	#[error("column {index} holds {found}, expected {expected}")]
	WrongType {
		index: usize,
		expected: &'static str,
		found: &'static str,
	},
	#[error("column {index} is NULL")]
	UnexpectedNull { index: usize },
}

impl SqlError {
	pub fn driver<E>(e: E) -> SqlError
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		SqlError::Driver(Box::new(e))
	}
}

/// A single column value as returned by a catalog query, also used for bind parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Null,
	Int(i64),
	Text(String),
}

impl Value {
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "NULL",
			Value::Int(_) => "integer",
			Value::Text(_) => "text",
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Value::Null => write!(f, "NULL"),
			Value::Int(i) => write!(f, "{}", i),
			Value::Text(s) => write!(f, "'{}'", s),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Value {
		Value::Text(s.to_owned())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Value {
		Value::Text(s)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Value {
		Value::Int(i)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Value {
		v.map(Into::into).unwrap_or(Value::Null)
	}
}

/// One row of a query result, columns in select-list order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
	columns: Vec<Value>,
}

impl Row {
	pub fn new(columns: Vec<Value>) -> Row {
		Row { columns }
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Value> {
		self.columns.get(index)
	}

	/// Converts the value in column `index` (0-based)
	pub fn try_get<T: FromValue>(&self, index: usize) -> Result<T, SqlError> {
		let value = self.columns.get(index).ok_or(SqlError::MissingColumn {
			index,
			len: self.columns.len(),
		})?;
		T::from_value(value, index)
	}
}

impl From<Vec<Value>> for Row {
	fn from(columns: Vec<Value>) -> Row {
		Row::new(columns)
	}
}

/// The rows produced by one [`QueryExecutor::execute`] call
///
/// [`QueryExecutor::execute`]: ./trait.QueryExecutor.html#tymethod.execute
#[derive(Debug, Default)]
pub struct RowCursor {
	rows: std::vec::IntoIter<Row>,
}

impl RowCursor {
	pub fn new(rows: Vec<Row>) -> RowCursor {
		RowCursor {
			rows: rows.into_iter(),
		}
	}

	/// Takes the next row, `None` once the cursor is exhausted
	pub fn fetch_one(&mut self) -> Option<Row> {
		self.rows.next()
	}
}

impl Iterator for RowCursor {
	type Item = Row;

	fn next(&mut self) -> Option<Row> {
		self.rows.next()
	}
}

/// A session able to run catalog queries
///
/// Binds are named (`:owner` in the SQL text, `("owner", value)` in `params`); values are never spliced into the SQL text
pub trait QueryExecutor {
	fn execute(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<RowCursor, SqlError>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &mut E {
	fn execute(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<RowCursor, SqlError> {
		(**self).execute(sql, params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cursor_fetches_in_order_then_runs_dry() {
		let mut cursor = RowCursor::new(vec![
			Row::new(vec![Value::Int(1)]),
			Row::new(vec![Value::Int(2)]),
		]);
		assert_eq!(cursor.fetch_one(), Some(Row::new(vec![Value::Int(1)])));
		assert_eq!(cursor.next(), Some(Row::new(vec![Value::Int(2)])));
		assert_eq!(cursor.fetch_one(), None);
	}

	#[test]
	fn missing_column_is_reported() {
		let row = Row::new(vec![Value::from("X")]);
		match row.try_get::<String>(3) {
			Err(SqlError::MissingColumn { index: 3, len: 1 }) => {},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn optional_values_become_null() {
		assert_eq!(Value::from(None::<&str>), Value::Null);
		assert_eq!(Value::from(Some("SCOTT")), Value::Text("SCOTT".into()));
	}
}
