//! Documentation scanned out of stored package source
//!
//! Package specs document themselves with marker comments:
//!
//! ```text
//! CREATE OR REPLACE PACKAGE keyword
//! --+ Keywords attached to assets.
//! AS
//!     --+ Attach `word` to asset `id`.
//!     PROCEDURE add(id NUMBER, word VARCHAR2);
//! END;
//! ```
//!
//! Marker lines before the `AS`/`IS` line document the package, marker lines inside the body document the next declared routine
use super::{
	catalog_select_types::*,
	error::Result,
	sql_tree::{DocIndex, PackageIdentity},
};
use once_cell::sync::Lazy;
use orapig_core::*;
use regex::Regex;

static DOC_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*--\s?\+\s(.*)").unwrap());
static BODY_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(AS|IS)\s*$").unwrap());
static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(function|procedure)\s+([^\s(;]+)").unwrap());

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
	Header,
	Body,
}

/// Single pass, two state scanner over the lines of one package
#[derive(Debug)]
pub struct DocScanner {
	state: ScanState,
	package_doc: String,
	pending: String,
	index: DocIndex,
}

impl Default for DocScanner {
	fn default() -> DocScanner {
		DocScanner::new()
	}
}

impl DocScanner {
	pub fn new() -> DocScanner {
		DocScanner {
			state: ScanState::Header,
			package_doc: String::new(),
			pending: String::new(),
			index: DocIndex::default(),
		}
	}

	pub fn feed(&mut self, line: &str) {
		let marker = DOC_MARKER.captures(line).map(|c| c.get(1).map_or("", |m| m.as_str()));
		match self.state {
			ScanState::Header => {
				if let Some(text) = marker {
					push_line(&mut self.package_doc, text);
				} else if BODY_START.is_match(line) {
					self.state = ScanState::Body;
				}
			},
			ScanState::Body => {
				if let Some(text) = marker {
					push_line(&mut self.pending, text);
				} else if let Some(caps) = DECLARATION.captures(line) {
					let name = caps[2].to_lowercase();
					let pending = std::mem::take(&mut self.pending);
					if !pending.is_empty() {
						self.index.routine_docs.insert(name, reindent(&pending, 2));
					}
				}
			},
		}
	}

	pub fn finish(mut self) -> DocIndex {
		self.index.package_doc = self.package_doc;
		self.index
	}
}

fn push_line(buf: &mut String, text: &str) {
	buf.push_str(text.trim_end());
	buf.push('\n');
}

/// Prefixes every line with `level` indents, trailing whitespace stripped
pub fn reindent(text: &str, level: usize) -> String {
	let spaces = INDENT.repeat(level);
	text.lines()
		.map(|l| format!("{}{}", spaces, l).trim_end().to_owned())
		.collect::<Vec<_>>()
		.join("\n")
}

/// Scans the source lines of a package without touching the catalog
pub fn scan_lines<'l, I>(lines: I) -> DocIndex
where
	I: IntoIterator<Item = &'l str>,
{
	let mut scanner = DocScanner::new();
	for line in lines {
		scanner.feed(line);
	}
	scanner.finish()
}

pub struct DocExtractor;

impl DocExtractor {
	/// Reads the source of the package declaration in line order and scans it
	#[tracing::instrument(skip_all, fields(package = %identity.canonical_name))]
	pub fn extract<E: QueryExecutor>(executor: &mut E, identity: &PackageIdentity) -> Result<DocIndex> {
		let params = [
			("owner", Value::from(identity.owner.as_deref())),
			("package_name", Value::from(identity.canonical_name.as_str())),
		];
		let mut scanner = DocScanner::new();
		let mut lines = 0usize;
		for row in executor.execute(GET_PACKAGE_SOURCE, &params)? {
			let line = GetSourceLine::from_row(&row)?;
			scanner.feed(line.text.as_deref().unwrap_or(""));
			lines += 1;
		}
		let index = scanner.finish();
		tracing::debug!(lines, documented = index.routine_docs.len(), "scanned package source");
		Ok(index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const KEYWORD_SPEC: &str = "PACKAGE keyword
--+ Keywords attached to assets.
--+ One row per (asset, word).
AS
    --+ Attach a word to an asset.
    --+   id: the asset id
    PROCEDURE add(id NUMBER, word VARCHAR2);

    FUNCTION all_words RETURN sys_refcursor;

    -- + Every keyword of one asset.
    function get_keywords2(id NUMBER) return sys_refcursor;
END keyword;
";

	#[test]
	fn package_and_routine_docs() {
		let index = scan_lines(KEYWORD_SPEC.lines());
		assert_eq!(index.package_doc, "Keywords attached to assets.\nOne row per (asset, word).\n");
		assert_eq!(index.routine_doc("ADD"), Some("        Attach a word to an asset.\n          id: the asset id"));
		assert_eq!(index.routine_doc("get_keywords2"), Some("        Every keyword of one asset."));
		assert_eq!(index.routine_doc("all_words"), None);
	}

	#[test]
	fn header_stops_at_is_line() {
		let index = scan_lines(vec!["package p", "--+ before", "  is  ", "--+ after", "procedure x;"]);
		assert_eq!(index.package_doc, "before\n");
		assert_eq!(index.routine_doc("x"), Some("        after"));
	}

	#[test]
	fn declarations_before_the_body_are_ignored() {
		let index = scan_lines(vec!["--+ doc", "procedure early;", "AS", "procedure late;"]);
		assert_eq!(index.package_doc, "doc\n");
		assert!(index.routine_docs.is_empty());
	}

	#[test]
	fn reindent_strips_trailing_space() {
		assert_eq!(reindent("a  \n\nb", 1), "    a\n\n    b");
		assert_eq!(reindent("", 2), "");
	}

	proptest! {
		#[test]
		fn no_marker_lines_means_no_docs(lines in prop::collection::vec("[A-Za-z0-9 ();,-]{0,40}", 0..30)) {
			let lines: Vec<&str> = lines.iter().map(String::as_str).filter(|l| !DOC_MARKER.is_match(l)).collect();
			let index = scan_lines(lines);
			prop_assert_eq!(index.package_doc, "");
			prop_assert!(index.routine_docs.is_empty());
		}

		#[test]
		fn routine_doc_keys_are_lower_case(name in "[A-Za-z][A-Za-z0-9_]{0,20}") {
			let decl = format!("  procedure {};", name);
			let index = scan_lines(vec!["AS", "--+ documented", decl.as_str()]);
			let lower = name.to_lowercase();
			let keys: Vec<&String> = index.routine_docs.keys().collect();
			prop_assert_eq!(keys, vec![&lower]);
		}
	}
}
