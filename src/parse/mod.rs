//! The directive dispatcher and the matchers it drives.
//!
//! The parser makes a single pass over the input. Free text between directives is ignored. Each
//! `@keyword{...}` or `@keyword(...)` directive is classified by its keyword and its body is handed
//! to the matcher for that kind of directive:
//!
//! | Keyword     | Body                                            | Result                    |
//! |-------------|-------------------------------------------------|---------------------------|
//! | `string`    | [`match_token`], then the string builder        | merged into the macros    |
//! | `preamble`  | [`match_value`]                                 | pushed to `preambles`     |
//! | `comment`   | raw text with balanced brackets                 | pushed to `comments`      |
//! | other       | [`match_token`], then the entry builder         | pushed to `entries`       |
//!
//! Keywords are matched case-insensitively. Malformed structure aborts the whole parse with a
//! syntax [`Error`](crate::Error); a missing comma between two tags, or a missing `#` between two
//! operands, is recorded in the output and parsing continues.
pub mod scan;
pub mod text;
mod token;
mod value;

pub use token::{TokenPart, match_token};
pub use value::match_value;

use tracing::trace;
use unicase::UniCase;

use crate::document::{BareTokenPolicy, Document, build_entry, build_strings};
use crate::error::Result;
use crate::macros::MacroTable;
use scan::{expect, read_key, skip_insignificant};

/// Options for a [`Parser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Seed the macro table with `jan` to `dec` before parsing.
    pub month_macros: bool,
    /// How to handle bare tokens after the citation key.
    pub bare_tokens: BareTokenPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            month_macros: true,
            bare_tokens: BareTokenPolicy::Ignore,
        }
    }
}

/// The kind of a directive, determined by its keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind<'r> {
    /// `@string`
    Macro,
    /// `@preamble`
    Preamble,
    /// `@comment`
    Comment,
    /// Any other keyword, which is the entry type.
    Entry(&'r str),
}

impl<'r> DirectiveKind<'r> {
    pub fn classify(keyword: &'r str) -> Self {
        let uni = UniCase::ascii(keyword);
        if uni == UniCase::ascii("string") {
            Self::Macro
        } else if uni == UniCase::ascii("preamble") {
            Self::Preamble
        } else if uni == UniCase::ascii("comment") {
            Self::Comment
        } else {
            Self::Entry(keyword)
        }
    }
}

/// A single-use parser over an input string.
///
/// ```
/// use lenient_bibtex::Parser;
///
/// let doc = Parser::new(r#"
///     @string{pub = "Publisher"}
///     @book{key, publisher = pub # ", " # {City}, year = 2014}
/// "#)
/// .parse()
/// .unwrap();
///
/// let entry = doc.entry("key").unwrap();
/// assert_eq!(
///     doc.resolve_tag(entry, "publisher").unwrap().unwrap(),
///     "Publisher, City"
/// );
/// ```
#[derive(Debug)]
pub struct Parser<'r> {
    input: &'r str,
    pos: usize,
    config: ParserConfig,
    document: Document,
}

impl<'r> Parser<'r> {
    /// Create a new parser with the default configuration.
    pub fn new(input: &'r str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &'r str, config: ParserConfig) -> Self {
        let mut document = Document::default();
        if config.month_macros {
            document.macros.set_month_macros();
        }
        Self {
            input,
            pos: 0,
            config,
            document,
        }
    }

    /// Create a parser which extends an existing macro table, such as the table of a previously
    /// parsed document. Month macros are not re-seeded.
    pub fn with_macros(input: &'r str, macros: MacroTable) -> Self {
        let config = ParserConfig {
            month_macros: false,
            ..ParserConfig::default()
        };
        let mut parser = Self::with_config(input, config);
        parser.document.macros = macros;
        parser
    }

    /// Parse the entire input.
    pub fn parse(mut self) -> Result<Document> {
        while let Some(pos) = scan::next_directive(self.input, self.pos) {
            self.pos = self.directive(pos)?;
        }
        Ok(self.document)
    }

    /// Parse the directive whose `@` is at `start`, returning the position after it.
    fn directive(&mut self, start: usize) -> Result<usize> {
        let input = self.input;
        let (pos, _) = expect(input, start, b"@")?;
        let pos = skip_insignificant(input, pos);
        let (pos, keyword) = read_key(input, pos)?;
        let (body, open) = expect(input, pos, b"{(")?;
        let terminator = if open == b'{' { b'}' } else { b')' };

        let kind = DirectiveKind::classify(keyword);
        trace!(pos = start, ?kind, "directive");

        let end = match kind {
            DirectiveKind::Macro => {
                let (end, parts) = match_token(input, body, terminator)?;
                self.document.macros.merge(build_strings(parts));
                end
            }
            DirectiveKind::Preamble => {
                let (pos, value) = match_value(input, body, terminator)?;
                let (end, _) = text::raw_body(input, pos, terminator)?;
                self.document.preambles.push(value);
                end
            }
            DirectiveKind::Comment => {
                let (end, raw) = text::raw_body(input, body, terminator)?;
                self.document.comments.push(raw.to_string());
                end
            }
            DirectiveKind::Entry(entry_type) => {
                let (end, parts) = match_token(input, body, terminator)?;
                let entry = build_entry(entry_type, parts, self.config.bare_tokens, start)?;
                self.document.entries.push(entry);
                end
            }
        };

        // skip the terminator
        Ok(end + 1)
    }
}
