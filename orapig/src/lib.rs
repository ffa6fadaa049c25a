//! Connects to an Oracle data dictionary and generates a Python (cx_Oracle) class for each requested package, with a method per stored function and procedure
//!
//! The pipeline runs per package: [`SchemaIntrospector`] resolves the name and reads the catalog, [`DocExtractor`] scans the package source for doc comments, [`classify`] picks a calling convention for each routine and [`py_convert`] renders it
//!
//! ```no_run
//! use orapig::{CompileOptions, Compiler, connection::PgExecutor};
//! use orapig_core::WriteSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = postgres::Client::connect("host=localhost user=app", postgres::NoTls)?;
//! let mut compiler = Compiler::new(PgExecutor::new(client), CompileOptions::default())?;
//! let mut out = WriteSink::new(std::io::stdout());
//! compiler.compile(&["KEYWORD"], &mut out)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`SchemaIntrospector`]: ./introspect/struct.SchemaIntrospector.html
//! [`DocExtractor`]: ./doc_extract/struct.DocExtractor.html
//! [`classify`]: ./classify/fn.classify.html
//! [`py_convert`]: ./py_convert/index.html

pub mod catalog_select_types;
pub mod classify;
pub mod compiler;
pub mod connection;
pub mod doc_extract;
pub mod error;
pub mod introspect;
pub mod py_convert;
pub mod sql_tree;
pub mod type_map;

pub use compiler::{CompileOptions, Compiler, GeneratedUnit, Target, HELP_FMT};
pub use error::{CompileError, Result};
pub use introspect::CatalogScope;

use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "orapig", about = "Generates Python classes wrapping the stored procedures of database packages")]
pub struct Opt {
	/// Connection string, e.g. "host=db user=app dbname=orcl"
	#[structopt(short = "C", long = "conn")]
	pub conn: Option<String>,

	/// Password for the connection, overrides any given in the connection string
	#[structopt(short = "P", long = "pass")]
	pub password: Option<String>,

	/// Output file, stdout if not present
	#[structopt(short, long, parse(from_os_str))]
	pub output: Option<PathBuf>,

	/// Write one module per package into the directory given by --output
	#[structopt(long)]
	pub dir: bool,

	/// Language of the generated code
	#[structopt(long, default_value = "python")]
	pub lang: String,

	/// Resolve package names through synonyms across every schema the session can see
	#[structopt(long)]
	pub all_schemas: bool,

	/// Print what the catalog says about each package instead of generating code
	#[structopt(long)]
	pub dump: bool,

	/// Explain how to document packages for orapig and exit
	#[structopt(long)]
	pub helpfmt: bool,

	/// Activate debug logging
	#[structopt(short, long)]
	pub debug: bool,

	/// Packages to generate classes for, optionally schema qualified
	#[structopt(name = "PACKAGE")]
	pub packages: Vec<String>,
}

impl Opt {
	pub fn compile_options(&self) -> Result<CompileOptions> {
		Ok(CompileOptions {
			scope: if self.all_schemas {
				CatalogScope::AllSchemas
			} else {
				CatalogScope::SessionSchema
			},
			target: self.lang.parse()?,
		})
	}

	/// Connects to the database named by `--conn`
	pub fn get_client(&self) -> std::result::Result<postgres::Client, postgres::Error> {
		let mut config: postgres::Config = self.conn.as_deref().unwrap_or_default().parse()?;
		if let Some(password) = &self.password {
			config.password(password);
		}
		config.connect(postgres::NoTls)
	}
}
