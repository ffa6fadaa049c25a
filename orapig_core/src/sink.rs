use std::io::{self, Write};

/// Destination for generated source, one line at a time
pub trait Sink {
	fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl Sink for Vec<String> {
	fn write_line(&mut self, line: &str) -> io::Result<()> {
		self.push(line.to_owned());
		Ok(())
	}
}

impl<S: Sink + ?Sized> Sink for &mut S {
	fn write_line(&mut self, line: &str) -> io::Result<()> {
		(**self).write_line(line)
	}
}

/// Adapts any [`std::io::Write`] (a file, stdout, stderr) into a [`Sink`], terminating every line with `\n`
///
/// [`Sink`]: ./trait.Sink.html
pub struct WriteSink<W: Write> {
	inner: W,
}

impl<W: Write> WriteSink<W> {
	pub fn new(inner: W) -> WriteSink<W> {
		WriteSink { inner }
	}

	pub fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}

	pub fn into_inner(self) -> W {
		self.inner
	}
}

impl<W: Write> Sink for WriteSink<W> {
	fn write_line(&mut self, line: &str) -> io::Result<()> {
		self.inner.write_all(line.as_bytes())?;
		self.inner.write_all(b"\n")
	}
}
