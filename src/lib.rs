//! A tolerant BibTeX parser.
//!
//! Parsing produces a [`Document`] holding the entries, `@string` macros, preambles and comments of
//! a `.bib` file. Values are kept as sequences of [`ValuePart`]s, so macro references survive the
//! parse and can be expanded later with [`resolve`] or [`Document::resolve_tag`].
//!
//! ```
//! let doc = lenient_bibtex::parse(r#"
//!     @string{ed = "Ed"}
//!     @article{key1, title = "T", month = jan, note = ed # {ited}}
//! "#)
//! .unwrap();
//!
//! let entry = doc.entry("key1").unwrap();
//! assert_eq!(doc.resolve_tag(entry, "month").unwrap().unwrap(), "January");
//! assert_eq!(doc.resolve_tag(entry, "note").unwrap().unwrap(), "Edited");
//! ```
//!
//! Structural errors such as an unterminated directive abort the parse. A missing comma between two
//! tags does not: the value it occurs in carries a [`ValuePart::Error`] and the following tag is
//! still read. Operands written side by side without `#` are reported the same way. Use
//! [`Document::check_strict`] to turn such errors into a hard failure.

/// Document types and the builders which assemble them.
mod document;

/// Error types for parsing and resolution.
pub mod error;

/// The macro table.
pub mod macros;

/// The directive dispatcher and lower-level matchers.
pub mod parse;

/// Macro resolution with cycle detection.
pub mod resolve;

/// Representations of BibTeX values.
pub mod value;

#[cfg(feature = "syntax")]
pub mod syntax;

// re-exports
pub use document::{BareTokenPolicy, Document, Entry};
pub use error::{Category, Error, ErrorCode, Result};
pub use macros::{MacroTable, Variable};
pub use parse::{Parser, ParserConfig};
pub use resolve::{resolve, resolve_by_name};
pub use value::{ContentError, Delimiter, Value, ValuePart};

/// Parse a bibliography with the default configuration.
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input).parse()
}

/// Parse a bibliography, starting from an existing macro table instead of the month macros.
///
/// This allows macros defined in one file to be used by another:
/// ```
/// use lenient_bibtex::{parse, parse_with_macros};
///
/// let strings = parse("@string{acm = {ACM}}").unwrap();
/// let doc = parse_with_macros("@book{k, publisher = acm}", strings.macros).unwrap();
/// let entry = doc.entry("k").unwrap();
/// assert_eq!(doc.resolve_tag(entry, "publisher").unwrap().unwrap(), "ACM");
/// ```
pub fn parse_with_macros(input: &str, macros: MacroTable) -> Result<Document> {
    Parser::with_macros(input, macros).parse()
}
