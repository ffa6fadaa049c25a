use super::{Row, SqlError, Value};
use std::convert::TryFrom;


/// Converts from a [`Row`]. Implementations are provided for rows that contain only a single value of a type implementing [`FromValue`] (currently no check is done that the row only contained one value)
///
/// Structs get an implementation from `#[derive(TryFromRow)]`, which reads field `n` from column `n`
///
/// [`Row`]: ./struct.Row.html
/// [`FromValue`]: ./trait.FromValue.html
pub trait TryFromRow: Sized {
	fn from_row(row: &Row) -> Result<Self, SqlError>;
}

/// Converts a single column [`Value`]
///
/// `index` is only used for error reporting
///
/// [`Value`]: ./enum.Value.html
pub trait FromValue: Sized {
	fn from_value(value: &Value, index: usize) -> Result<Self, SqlError>;
}

impl TryFromRow for () {
	fn from_row(_row: &Row) -> Result<Self, SqlError> {
		Ok(())
	}
}

impl FromValue for String {
	fn from_value(value: &Value, index: usize) -> Result<Self, SqlError> {
		match value {
			Value::Text(s) => Ok(s.clone()),
			Value::Int(i) => Ok(i.to_string()),
			Value::Null => Err(SqlError::UnexpectedNull { index }),
		}
	}
}

impl FromValue for i64 {
	fn from_value(value: &Value, index: usize) -> Result<Self, SqlError> {
		match value {
			Value::Int(i) => Ok(*i),
			// NUMBER columns may arrive in their text form
			Value::Text(s) => s.trim().parse().map_err(|_| SqlError::WrongType {
				index,
				expected: "integer",
				found: value.kind(),
			}),
			Value::Null => Err(SqlError::UnexpectedNull { index }),
		}
	}
}

/// Integer conversions narrower than i64 that are range checked
macro_rules! from_value_int {
	($impl_type:ty) => {
		impl FromValue for $impl_type {
			fn from_value(value: &Value, index: usize) -> Result<Self, SqlError> {
				let wide = i64::from_value(value, index)?;
				<$impl_type>::try_from(wide).map_err(|_| SqlError::WrongType {
					index,
					expected: stringify!($impl_type),
					found: "out of range integer",
				})
			}
		}
	};
}

from_value_int!(i32);
from_value_int!(u32);
from_value_int!(usize);

impl FromValue for bool {
	fn from_value(value: &Value, index: usize) -> Result<Self, SqlError> {
		Ok(i64::from_value(value, index)? != 0)
	}
}

impl<T: FromValue> FromValue for Option<T> {
	fn from_value(value: &Value, index: usize) -> Result<Self, SqlError> {
		match value {
			Value::Null => Ok(None),
			v => T::from_value(v, index).map(Some),
		}
	}
}

/// Provides an implementation of [`TryFromRow`] for a given type that implements [`FromValue`]
///
/// Does not check if the row contains more than one value (i.e. a row containing 3 columns with the first being a count will be directly convertable to an i64)
///
/// [`TryFromRow`]: ./trait.TryFromRow.html
/// [`FromValue`]: ./trait.FromValue.html
macro_rules! try_from_row {
	($impl_type:ty) => {
		impl TryFromRow for $impl_type {
			fn from_row(row: &Row) -> Result<Self, SqlError> {
				row.try_get(0)
			}
		}
	};
}

try_from_row!(bool);
try_from_row!(i32);
try_from_row!(u32);
try_from_row!(i64);
try_from_row!(usize);
try_from_row!(String);
try_from_row!(Option<String>);
try_from_row!(Option<i64>);


// auto implementations for tuples (useful for quick queries)
macro_rules! try_from_tuple {
	($($typ_name:ident),*, $($number:literal),*) => {
		impl< $($typ_name:FromValue),* > TryFromRow for ($($typ_name),*,) {
			fn from_row(row: &Row) -> Result<Self, SqlError> {
				Ok((
					$(row.try_get($number)?),*,
				))
			}
		}
	};
}
try_from_tuple!(A, 0);
try_from_tuple!(A, B, 0, 1);
try_from_tuple!(A, B, C, 0, 1, 2);
try_from_tuple!(A, B, C, D, 0, 1, 2, 3);
try_from_tuple!(A, B, C, D, E, 0, 1, 2, 3, 4);
