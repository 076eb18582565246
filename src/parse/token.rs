//! The balanced token matcher, which splits a directive body into keys and tag assignments.
use std::borrow::Cow;

use super::scan::{clean_run, line_comment, skip_layout, starts_line};
use super::text::{balanced, protected};
use super::value::match_value;
use crate::error::{Error, ErrorCode, Result};
use crate::value::Value;

/// One component of a directive body.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPart<'r> {
    /// A bare token, such as the citation key.
    Key(Cow<'r, str>),
    /// A `name = value` assignment.
    Tag { name: Cow<'r, str>, value: Value },
}

/// Scan a directive body starting at `start` until `terminator` at nesting depth zero.
///
/// Returns the position of the terminator, which is not consumed. Quoted and braced spans outside
/// a tag value are skipped without being interpreted. A trailing bare token before the terminator
/// is emitted as a key, so the last tag of an entry does not need a trailing comma.
pub fn match_token(
    input: &str,
    start: usize,
    terminator: u8,
) -> Result<(usize, Vec<TokenPart<'_>>)> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut pos = skip_layout(input, start);
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
            b if b == terminator => break,
            b'"' => {
                let (end, _) = protected(b'"')(input, pos + 1)?;
                pos = end + 1;
            }
            b'{' => {
                let (end, _) = balanced(input, pos + 1)?;
                pos = end + 1;
            }
            b',' => {
                push_key(&mut parts, input, run_start, pos);
                pos = skip_layout(input, pos + 1);
                run_start = pos;
            }
            b'=' => {
                let name = clean_run(input, run_start, pos);
                let (end, value) = match_value(input, pos + 1, terminator)?;
                parts.push(TokenPart::Tag { name, value });
                pos = end;
                run_start = pos;
            }
            b'%' if starts_line(input, pos) => pos = line_comment(input, pos),
            _ => pos += 1,
        }
    }

    push_key(&mut parts, input, run_start, pos);
    Ok((pos, parts))
}

fn push_key<'r>(parts: &mut Vec<TokenPart<'r>>, input: &'r str, start: usize, end: usize) {
    let key = clean_run(input, start, end);
    if !key.is_empty() {
        parts.push(TokenPart::Key(key));
    }
}
