//! Text runs delimited by `{}` or `"`.
//!
//! Both matchers start immediately after the opening delimiter and return the position of the
//! closing delimiter together with the captured text in between. The closing delimiter is not
//! consumed.
use memchr::{memchr2_iter, memchr3_iter};

use crate::error::{Error, ErrorCode, Result};

/// Consume a string with balanced brackets, until the string becomes unbalanced.
pub fn balanced(input: &str, start: usize) -> Result<(usize, &str)> {
    let bytes = input.as_bytes();
    let mut bracket_depth = 0usize;

    for offset in memchr2_iter(b'{', b'}', &bytes[start..]) {
        let end = start + offset;
        if bytes[end] == b'{' {
            bracket_depth += 1;
        } else {
            // found the closing bracket
            if bracket_depth == 0 {
                return Ok((end, &input[start..end]));
            }
            bracket_depth -= 1;
        }
    }

    Err(Error::syntax(
        ErrorCode::UnterminatedText { terminator: '}' },
        start,
    ))
}

/// Consume a string with balanced brackets, terminating when we hit a top-level byte `until`.
///
/// A closing bracket with no matching opening bracket is kept as ordinary text. `until` must be
/// ASCII and must not be a bracket.
pub fn protected(until: u8) -> impl Fn(&str, usize) -> Result<(usize, &str)> {
    debug_assert!(until.is_ascii() && until != b'{' && until != b'}');

    move |input: &str, start: usize| {
        let bytes = input.as_bytes();
        let mut bracket_depth = 0usize;

        for offset in memchr3_iter(until, b'{', b'}', &bytes[start..]) {
            let end = start + offset;
            match bytes[end] {
                b if b == until => {
                    if bracket_depth == 0 {
                        return Ok((end, &input[start..end]));
                    }
                }
                b'{' => bracket_depth += 1,
                _ => bracket_depth = bracket_depth.saturating_sub(1),
            }
        }

        Err(Error::syntax(
            ErrorCode::UnterminatedText {
                terminator: until as char,
            },
            start,
        ))
    }
}

/// Consume the remainder of a directive body up to its terminator, which must be `}` or `)`.
pub fn raw_body(input: &str, start: usize, terminator: u8) -> Result<(usize, &str)> {
    let res = if terminator == b'}' {
        balanced(input, start)
    } else {
        protected(terminator)(input, start)
    };

    res.map_err(|_| {
        Error::syntax(
            ErrorCode::UnterminatedDirective {
                terminator: terminator as char,
            },
            start,
        )
    })
}
