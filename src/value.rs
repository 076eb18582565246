use std::fmt;

use serde::Serialize;

/// How a text run was delimited in the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Delimiter {
    /// `"quoted"`
    Quote,
    /// `{braced}`
    Brace,
    /// An undelimited number, such as `2014` in `year = 2014`.
    Bare,
}

/// A recoverable problem found while parsing, embedded in the output instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentError {
    pub message: String,
    /// The text of the input which triggered the error.
    pub raw_span: String,
}

pub(crate) const MISSING_COMMA: &str = "Invalid token parsed, was looking for a comma [,] but found \
                                        equals [=], your BibTeX most likely contains an error";

pub(crate) const MISSING_HASH: &str =
    "Expected no characters between the last string or text and the comma";

pub(crate) const EXTRA_BARE_TOKEN: &str =
    "Unexpected bare token after the citation key, expected a tag assignment";

impl ContentError {
    pub(crate) fn missing_comma(raw_span: &str) -> Self {
        Self {
            message: MISSING_COMMA.to_string(),
            raw_span: raw_span.to_string(),
        }
    }

    pub(crate) fn missing_hash(raw_span: &str) -> Self {
        Self {
            message: MISSING_HASH.to_string(),
            raw_span: raw_span.to_string(),
        }
    }

    pub(crate) fn extra_bare_token(raw_span: &str) -> Self {
        Self {
            message: EXTRA_BARE_TOKEN.to_string(),
            raw_span: raw_span.to_string(),
        }
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (near '{}')", self.message, self.raw_span)
    }
}

/// One part of a value `{Title } # 2012 # var`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValuePart {
    /// Literal text.
    Text { delimiter: Delimiter, content: String },
    /// A reference to a macro defined with `@string`.
    MacroRef { name: String },
    /// An embedded diagnostic.
    Error(ContentError),
}

impl ValuePart {
    pub fn quoted<S: Into<String>>(s: S) -> Self {
        Self::Text {
            delimiter: Delimiter::Quote,
            content: s.into(),
        }
    }

    pub fn braced<S: Into<String>>(s: S) -> Self {
        Self::Text {
            delimiter: Delimiter::Brace,
            content: s.into(),
        }
    }

    pub fn bare<S: Into<String>>(s: S) -> Self {
        Self::Text {
            delimiter: Delimiter::Bare,
            content: s.into(),
        }
    }

    pub fn macro_ref<S: Into<String>>(s: S) -> Self {
        Self::MacroRef { name: s.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// The value of a tag or macro: a `#`-concatenated sequence of parts, in source order.
#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize)]
#[serde(transparent)]
pub struct Value(pub Vec<ValuePart>);

impl Value {
    pub fn parts(&self) -> &[ValuePart] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the embedded content errors.
    pub fn errors(&self) -> impl Iterator<Item = &ContentError> {
        self.0.iter().filter_map(|part| match part {
            ValuePart::Error(err) => Some(err),
            _ => None,
        })
    }
}

impl FromIterator<ValuePart> for Value {
    fn from_iter<T: IntoIterator<Item = ValuePart>>(i: T) -> Value {
        Self(i.into_iter().collect())
    }
}

impl From<Vec<ValuePart>> for Value {
    fn from(parts: Vec<ValuePart>) -> Self {
        Self(parts)
    }
}

/// Writes the value back in `.bib` syntax. Content errors are omitted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut is_first = true;
        for part in self.0.iter() {
            if part.is_error() {
                continue;
            }
            if !is_first {
                f.write_str(" # ")?;
            }
            match part {
                ValuePart::Text {
                    delimiter: Delimiter::Quote,
                    content,
                } => write!(f, "\"{content}\"")?,
                ValuePart::Text {
                    delimiter: Delimiter::Brace,
                    content,
                } => write!(f, "{{{content}}}")?,
                ValuePart::Text {
                    delimiter: Delimiter::Bare,
                    content,
                } => f.write_str(content)?,
                ValuePart::MacroRef { name } => f.write_str(name)?,
                ValuePart::Error(_) => {}
            }
            is_first = false;
        }
        Ok(())
    }
}
