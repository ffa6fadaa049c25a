//! The anonymous PL/SQL block the batch form submits
use crate::sql_tree::ParameterDescriptor;
use std::fmt;

/// A 1-based positional bind marker, `:n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindMarker(pub usize);

impl BindMarker {
	/// the key of this marker in a cx_Oracle bind dictionary
	pub fn key(self) -> String {
		self.0.to_string()
	}
}

impl fmt::Display for BindMarker {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, ":{}", self.0)
	}
}

/// `begin TARGET(:1, ..., :N); end;`
///
/// Markers are derived from the parameter list, one per parameter in order, so the block always has exactly as many markers as the routine has parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTemplate {
	target: String,
	markers: Vec<BindMarker>,
}

impl CallTemplate {
	pub fn new(target: impl Into<String>, parameters: &[ParameterDescriptor]) -> CallTemplate {
		CallTemplate {
			target: target.into(),
			markers: (1..=parameters.len()).map(BindMarker).collect(),
		}
	}

	pub fn markers(&self) -> &[BindMarker] {
		&self.markers
	}
}

impl fmt::Display for CallTemplate {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "begin {}(", self.target)?;
		for (i, marker) in self.markers.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", marker)?;
		}
		f.write_str("); end;")
	}
}
