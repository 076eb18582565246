use std::fmt;

use crate::value::ContentError;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by parsing and macro resolution.
///
/// Syntax errors abort a parse and always carry the byte offset at which they occurred.
/// Resolution errors are only raised when a value is explicitly resolved, since macro references
/// are stored unresolved in a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    pos: Option<usize>,
}

/// The broad class of an [`Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category {
    /// Malformed input; the parse was aborted.
    Syntax,
    /// An embedded content error escalated by [`Document::check_strict`](crate::Document::check_strict).
    Content,
    /// A macro reference could not be expanded.
    Resolution,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCode {
    /// The input did not match the expected literal.
    TokenMismatch { expected: String, found: String },
    /// Reached the end of input while reading a key.
    RunawayKey,
    /// Reached the end of input inside a quoted or braced text run.
    UnterminatedText { terminator: char },
    /// Reached the end of input before the closing delimiter of a directive.
    UnterminatedDirective { terminator: char },
    /// An entry without a citation key.
    MissingCitationKey,
    /// A content error embedded in the document.
    Content(ContentError),
    /// A macro reference which is not defined in the macro table.
    UndefinedMacro(String),
    /// A macro which (indirectly) references itself.
    CyclicMacro(String),
}

impl Error {
    pub(crate) fn syntax(code: ErrorCode, pos: usize) -> Self {
        Self {
            code,
            pos: Some(pos),
        }
    }

    pub(crate) fn resolution(code: ErrorCode) -> Self {
        Self { code, pos: None }
    }

    pub(crate) fn content(err: ContentError) -> Self {
        Self {
            code: ErrorCode::Content(err),
            pos: None,
        }
    }

    /// The underlying error code.
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// The byte offset into the input at which a syntax error occurred.
    pub fn position(&self) -> Option<usize> {
        self.pos
    }

    pub fn classify(&self) -> Category {
        match self.code {
            ErrorCode::TokenMismatch { .. }
            | ErrorCode::RunawayKey
            | ErrorCode::UnterminatedText { .. }
            | ErrorCode::UnterminatedDirective { .. }
            | ErrorCode::MissingCitationKey => Category::Syntax,
            ErrorCode::Content(_) => Category::Content,
            ErrorCode::UndefinedMacro(_) | ErrorCode::CyclicMacro(_) => Category::Resolution,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    pub fn is_resolution(&self) -> bool {
        self.classify() == Category::Resolution
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::TokenMismatch { expected, found } => {
                write!(f, "token mismatch, expected {expected}, found {found}")
            }
            ErrorCode::RunawayKey => f.write_str("runaway key"),
            ErrorCode::UnterminatedText { terminator } => {
                write!(f, "unterminated text token, expected closing '{terminator}'")
            }
            ErrorCode::UnterminatedDirective { terminator } => {
                write!(f, "unterminated directive, expected closing '{terminator}'")
            }
            ErrorCode::MissingCitationKey => f.write_str("entry has no citation key"),
            ErrorCode::Content(err) => fmt::Display::fmt(err, f),
            ErrorCode::UndefinedMacro(name) => {
                write!(f, "undefined string: '{name}' was referenced")
            }
            ErrorCode::CyclicMacro(name) => {
                write!(f, "cyclic call detected while expanding '{name}'")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} at pos: {}", self.code, pos),
            None => fmt::Display::fmt(&self.code, f),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::syntax(
            ErrorCode::TokenMismatch {
                expected: "'{' or '('".into(),
                found: "'x'".into(),
            },
            12,
        );
        assert_eq!(
            err.to_string(),
            "token mismatch, expected '{' or '(', found 'x' at pos: 12"
        );
        assert_eq!(err.position(), Some(12));
        assert!(err.is_syntax());

        let err = Error::resolution(ErrorCode::UndefinedMacro("x".into()));
        assert_eq!(err.to_string(), "undefined string: 'x' was referenced");
        assert_eq!(err.position(), None);
        assert!(err.is_resolution());
    }
}
