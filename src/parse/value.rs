//! The value grammar: the right hand side of `key = value`.
use tracing::debug;

use super::scan::skip_whitespace;
use super::text::{balanced, protected};
use crate::error::{Error, ErrorCode, Result};
use crate::value::{ContentError, Value, ValuePart};

/// Parse a `#`-concatenated value starting at `start`.
///
/// The value ends at a top-level `,`, which is consumed, or at `terminator`, which is not. The
/// returned position is where scanning of the directive body should resume.
///
/// # Example
/// In the below entry with the cursor at `<>`
/// ```bib
/// @article{key,
///   title =<> "A" # b # {C},
///   year = 2014
/// }
/// ```
/// consumes ` "A" # b # {C},` and returns `[Text("A"), MacroRef("b"), Text("C")]`.
///
/// Two kinds of mistakes are recorded as a [`ContentError`] in the value instead of aborting:
/// 1. An operand which follows another without a `#` in between, as `stray` in `"A" stray`.
/// 2. An `=` found where a comma was expected. Scanning resumes at the start of the stray text,
///    so that `b` in `a = "1" b = "2"` is still read as the next tag name.
pub fn match_value(input: &str, start: usize, terminator: u8) -> Result<(usize, Value)> {
    let bytes = input.as_bytes();
    let mut operands = Operands::default();
    let mut pos = skip_whitespace(input, start);
    let mut run_start = pos;

    loop {
        let Some(&b) = bytes.get(pos) else {
            return Err(Error::syntax(
                ErrorCode::UnterminatedDirective {
                    terminator: terminator as char,
                },
                pos,
            ));
        };

        match b {
            b if b == terminator => {
                operands.push_bare(&input[run_start..pos]);
                return Ok((pos, operands.into_value()));
            }
            b',' => {
                operands.push_bare(&input[run_start..pos]);
                return Ok((pos + 1, operands.into_value()));
            }
            b'"' => {
                operands.push_bare(&input[run_start..pos]);
                let (end, text) = protected(b'"')(input, pos + 1)?;
                operands.push(ValuePart::quoted(text), &input[pos..=end]);
                pos = end + 1;
                run_start = pos;
            }
            b'{' => {
                operands.push_bare(&input[run_start..pos]);
                let (end, text) = balanced(input, pos + 1)?;
                operands.push(ValuePart::braced(text), &input[pos..=end]);
                pos = end + 1;
                run_start = pos;
            }
            b'#' => {
                operands.push_bare(&input[run_start..pos]);
                operands.expects_hash = false;
                pos += 1;
                run_start = pos;
            }
            b'=' => {
                let stray = input[run_start..pos].trim();
                debug!(pos, stray, "expected ',' but found '='");
                operands
                    .parts
                    .push(ValuePart::Error(ContentError::missing_comma(stray)));
                let resume = if stray.is_empty() {
                    pos + 1
                } else {
                    skip_whitespace(input, run_start)
                };
                return Ok((resume, operands.into_value()));
            }
            _ => pos += 1,
        }
    }
}

/// The parts of a value under construction.
#[derive(Default)]
struct Operands {
    parts: Vec<ValuePart>,
    /// Set after an operand, cleared by `#`.
    expects_hash: bool,
}

impl Operands {
    fn push(&mut self, part: ValuePart, raw: &str) {
        if self.expects_hash {
            debug!(raw, "expected '#' between operands");
            self.parts
                .push(ValuePart::Error(ContentError::missing_hash(raw)));
        } else {
            self.parts.push(part);
        }
        self.expects_hash = true;
    }

    /// Push an undelimited run: a number is literal text, anything else names a macro.
    fn push_bare(&mut self, run: &str) {
        let run = run.trim();
        if run.is_empty() {
            return;
        }

        if run.bytes().all(|b| b.is_ascii_digit()) {
            self.push(ValuePart::bare(run), run);
        } else {
            self.push(ValuePart::macro_ref(run), run);
        }
    }

    fn into_value(self) -> Value {
        Value(self.parts)
    }
}
