use orapig_core::SqlError;
use thiserror::Error;

/// Fatal conditions; any of them aborts the whole run before output is written
#[derive(Debug, Error)]
pub enum CompileError {
	/// The name is unknown, names a package member, or lives behind a database link
	#[error("cannot resolve package `{name}`: {reason}")]
	NameResolution { name: String, reason: String },

	/// A query that must produce exactly one row produced none
	#[error("catalog returned no row for {query} ({subject}); was the schema changed during the run?")]
	SchemaIntegrity { query: &'static str, subject: String },

	#[error("package not found: {0}")]
	PackageNotFound(String),

	#[error("function {package}.{routine} has no return type in the catalog")]
	MissingReturnType { package: String, routine: String },

	#[error("unsupported target language `{0}`")]
	UnsupportedTarget(String),

	#[error(transparent)]
	Sql(#[from] SqlError),

	#[error("failed to write generated output: {0}")]
	Io(#[from] std::io::Error),
}

impl CompileError {
	pub fn name_resolution(name: &str, reason: impl Into<String>) -> CompileError {
		CompileError::NameResolution {
			name: name.to_owned(),
			reason: reason.into(),
		}
	}
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
