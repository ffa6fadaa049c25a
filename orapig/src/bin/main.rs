use heck::SnakeCase;
use orapig::{connection::PgExecutor, Compiler, Opt, HELP_FMT};
use orapig_core::WriteSink;
use std::{
	fs::{self, File},
	io::{self, BufWriter},
	process,
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

fn main() {
	let opt = Opt::from_args();

	let default_level = if opt.debug { "debug" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
		.with_writer(io::stderr)
		.init();

	if opt.helpfmt {
		print!("{}", HELP_FMT);
		return;
	}
	if opt.conn.is_none() || opt.packages.is_empty() {
		eprintln!("usage: orapig -C <conn> [options] <PACKAGE>...  (see --help)");
		process::exit(1);
	}

	if let Err(e) = run(&opt) {
		eprintln!("orapig: {}", e);
		process::exit(1);
	}
}

fn run(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
	let options = opt.compile_options()?;
	let client = opt.get_client()?;
	let mut compiler = Compiler::new(PgExecutor::new(client), options)?;

	if opt.dump {
		let unit = compiler.dump(&opt.packages)?;
		unit.write_to(&mut WriteSink::new(io::stderr()))?;
		return Ok(());
	}

	if opt.dir {
		let dir = opt.output.clone().unwrap_or_else(|| ".".into());
		fs::create_dir_all(&dir)?;
		// every module is rendered before the first file is written
		let units = opt
			.packages
			.iter()
			.map(|package| compiler.render_package(package).map(|unit| (package, unit)))
			.collect::<Result<Vec<_>, _>>()?;
		for (package, unit) in units {
			let path = dir.join(format!("{}.py", package.replace('.', "_").to_snake_case()));
			let mut sink = WriteSink::new(BufWriter::new(File::create(&path)?));
			unit.write_to(&mut sink)?;
			sink.flush()?;
			tracing::info!(path = %path.display(), "wrote module");
		}
		return Ok(());
	}

	let unit = compiler.render(&opt.packages)?;
	match &opt.output {
		Some(path) => write_unit(&unit, WriteSink::new(BufWriter::new(File::create(path)?)))?,
		None => write_unit(&unit, WriteSink::new(io::stdout()))?,
	}
	Ok(())
}

fn write_unit<W: io::Write>(unit: &orapig::GeneratedUnit, mut sink: WriteSink<W>) -> io::Result<()> {
	unit.write_to(&mut sink)?;
	sink.flush()
}
