//! Lexical primitives.
//!
//! Every function takes the input and a byte position, and returns the updated position along
//! with any captured output. Positions only ever land immediately before or after an ASCII byte,
//! so slicing the input at them is always valid.
use std::borrow::Cow;

use memchr::{memchr, memchr_iter};

use crate::error::{Error, ErrorCode, Result};

// Lookup table for bytes permitted in a key: `[A-Za-z0-9?_:./-]`.
static KEY_ALLOWED: [bool; 256] = {
    let mut table = [false; 256];
    let mut b = 0;
    while b < 256 {
        table[b] = matches!(
            b as u8,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'?' | b'_' | b':' | b'.' | b'/' | b'-'
        );
        b += 1;
    }
    table
};

#[inline]
pub fn is_key_byte(b: u8) -> bool {
    KEY_ALLOWED[b as usize]
}

/// Skip a `%` comment starting at `pos`, returning the position after the terminating newline, or
/// the end of input.
#[inline]
pub fn line_comment(input: &str, pos: usize) -> usize {
    let bytes = input.as_bytes();
    match memchr(b'\n', &bytes[pos..]) {
        Some(offset) => pos + offset + 1,
        None => bytes.len(),
    }
}

/// Skip whitespace and `%` line comments.
pub fn skip_insignificant(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'%' => pos = line_comment(input, pos),
            _ => return pos,
        }
    }
    bytes.len()
}

/// Skip whitespace only.
#[inline]
pub fn skip_whitespace(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\r' | b'\n') {
        pos += 1;
    }
    pos
}

/// Whether `pos` is preceded only by whitespace on its line.
pub fn starts_line(input: &str, pos: usize) -> bool {
    input.as_bytes()[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b != b'\n')
        .all(|&b| matches!(b, b' ' | b'\t' | b'\r'))
}

/// Skip whitespace and `%` comments inside a directive body.
///
/// A `%` is only a comment when it is the first non-whitespace byte on its line, so `50%` or a `%`
/// before a closing bracket on the same line is ordinary text.
pub fn skip_layout(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    loop {
        pos = skip_whitespace(input, pos);
        if bytes.get(pos) == Some(&b'%') && starts_line(input, pos) {
            pos = line_comment(input, pos);
        } else {
            return pos;
        }
    }
}

/// Trim the run `input[start..end]`, removing any `%` comment lines inside it.
pub fn clean_run(input: &str, start: usize, end: usize) -> Cow<'_, str> {
    let run = &input[start..end];
    if !run.contains('%') {
        return Cow::Borrowed(run.trim());
    }

    let mut cleaned = String::with_capacity(run.len());
    let mut pos = start;
    for offset in memchr_iter(b'%', run.as_bytes()) {
        let idx = start + offset;
        if idx < pos || !starts_line(input, idx) {
            continue;
        }
        cleaned.push_str(&input[pos..idx]);
        pos = line_comment(input, idx).min(end);
    }
    cleaned.push_str(&input[pos..end]);

    Cow::Owned(cleaned.trim().to_string())
}

/// Skip insignificant input and consume one byte from `allowed`, returning the position after it
/// and the consumed byte.
pub fn expect(input: &str, pos: usize, allowed: &[u8]) -> Result<(usize, u8)> {
    let pos = skip_insignificant(input, pos);
    match input.as_bytes().get(pos) {
        Some(&b) if allowed.contains(&b) => Ok((pos + 1, b)),
        other => Err(Error::syntax(
            ErrorCode::TokenMismatch {
                expected: describe(allowed),
                found: match other {
                    Some(_) => format!("'{}'", found_char(input, pos)),
                    None => "end of input".to_string(),
                },
            },
            pos,
        )),
    }
}

fn describe(allowed: &[u8]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|b| format!("'{}'", *b as char)).collect();
    quoted.join(" or ")
}

fn found_char(input: &str, pos: usize) -> char {
    input[pos..].chars().next().unwrap_or_default()
}

/// Read a maximal run of key characters starting at `start`.
///
/// The run may be empty, but it must be terminated: reaching the end of input is an error.
pub fn read_key(input: &str, start: usize) -> Result<(usize, &str)> {
    let bytes = input.as_bytes();
    let mut end = start;

    while end < bytes.len() && is_key_byte(bytes[end]) {
        end += 1;
    }

    if end == bytes.len() {
        return Err(Error::syntax(ErrorCode::RunawayKey, start));
    }

    Ok((end, &input[start..end]))
}

/// Skip free text between directives, returning the position of the next `@`, or `None` if the
/// input is exhausted.
#[inline]
pub fn next_directive(input: &str, pos: usize) -> Option<usize> {
    memchr(b'@', input.as_bytes().get(pos..)?).map(|offset| pos + offset)
}
