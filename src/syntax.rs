//! # Description of the bibliography syntax
//! This module gives an explicit grammar for well-formed `.bib` input. Every input accepted by
//! this grammar is parsed by [`Parser`](crate::Parser) without content errors, and produces one
//! [`Entry`](crate::Entry) per `entry_directive`. The parser itself is more tolerant: see
//! [recovery](#recovery) for the input it accepts beyond this grammar.
//!
//! ## Structure of a bibliography
//! ### Whitespace, comments, and junk characters.
//! 1. Whitespace is a space, tab, carriage return or newline.
//!    ```ignore
//!    ws = _{ " " | "\t" | "\n" | "\r" }
//!    sp = _{ ws* }
//!    ```
//! 2. Inside a directive body, a line whose first non-whitespace character is `%` is a TeX
//!    comment. Anywhere else `%` is an ordinary character, so `note = 50%` is a value and a `%`
//!    before a closing bracket on the same line does not hide it. Comments may appear around
//!    keys and tag names, but not inside a value.
//!    ```ignore
//!    tex_comment = _{ "\n" ~ (" " | "\t" | "\r")* ~ "%" ~ (!"\n" ~ ANY)* }
//!    ign = _{ (tex_comment | ws)* }
//!    ```
//! 3. Junk is anything outside a directive, up to the next `@`.
//!    ```ignore
//!    junk = _{ (!"@" ~ ANY)* }
//!    ```
//!
//! ### Names
//! 1. The keyword following `@` is made of ASCII letters, digits and `?_:./-`.
//!    ```ignore
//!    key_char = _{ ASCII_ALPHANUMERIC | "?" | "_" | ":" | "." | "/" | "-" }
//!    entry_type = @{ key_char+ }
//!    ```
//! 2. A citation key, tag name or macro reference is any run of characters other than whitespace
//!    and the literal characters `,=#"{}()`.
//!    ```ignore
//!    name_char = _{ !(ws | "," | "=" | "#" | "\"" | "{" | "}" | "(" | ")") ~ ANY }
//!    citation_key = @{ name_char+ }
//!    tag_name = @{ name_char+ }
//!    ```
//!
//! ### Values
//! 1. A braced text run has balanced brackets `{}`.
//!    ```ignore
//!    balanced = _{ "{" ~ balanced* ~ "}" | (!("{" | "}") ~ ANY) }
//!    token_curly = @{ balanced* }
//!    ```
//! 2. A quoted text run is delimited by `"`. Brackets inside it must balance, and a `"` inside
//!    brackets does not close it.
//!    ```ignore
//!    quoted = _{ "{" ~ balanced* ~ "}" | (!("{" | "}" | "\"") ~ ANY) }
//!    token_quoted = @{ quoted* }
//!    ```
//! 3. An undelimited run of digits is a number. Any other undelimited run is a macro reference.
//!    ```ignore
//!    number = @{ ASCII_DIGIT+ ~ !name_char }
//!    macro_ref = @{ name_char+ }
//!    ```
//! 4. A value is one or more operands joined by `#`.
//!    ```ignore
//!    operand = _{ "{" ~ token_curly ~ "}" | "\"" ~ token_quoted ~ "\"" | number | macro_ref }
//!    value = { operand ~ (sp ~ "#" ~ sp ~ operand)* }
//!    field = { tag_name ~ ign ~ "=" ~ sp ~ value ~ sp }
//!    ```
//!
//! ### Directives
//! Every directive is delimited by `{}` or `()`, and the keyword is matched case-insensitively.
//! 1. A comment directive holds raw text. With `()` delimiters, a `)` inside brackets does not
//!    close it.
//!    ```ignore
//!    round = _{ "{" ~ balanced* ~ "}" | (!("{" | "}" | ")") ~ ANY) }
//!    token_round = @{ round* }
//!    comment_directive = { ^"comment" ~ !key_char ~ sp ~ ("{" ~ token_curly ~ "}" | "(" ~ token_round ~ ")") }
//!    ```
//! 2. A preamble directive holds a single value.
//!    ```ignore
//!    preamble_body = _{ sp ~ value ~ sp }
//!    preamble_directive = { ^"preamble" ~ !key_char ~ sp ~ ("{" ~ preamble_body ~ "}" | "(" ~ preamble_body ~ ")") }
//!    ```
//! 3. A string directive holds any number of comma separated fields, each defining a macro.
//!    ```ignore
//!    string_body = _{ ign ~ (field ~ ("," ~ ign ~ field)*)? ~ ("," ~ ign)? }
//!    string_directive = { ^"string" ~ !key_char ~ sp ~ ("{" ~ string_body ~ "}" | "(" ~ string_body ~ ")") }
//!    ```
//! 4. Any other keyword starts an entry: a citation key followed by fields, with an optional
//!    trailing comma.
//!    ```ignore
//!    entry_body = _{ ign ~ citation_key ~ ign ~ ("," ~ ign ~ field)* ~ ("," ~ ign)? }
//!    entry_directive = { entry_type ~ sp ~ ("{" ~ entry_body ~ "}" | "(" ~ entry_body ~ ")") }
//!    ```
//!
//! ### Bibliography
//! ```ignore
//! directive = _{ "@" ~ sp ~ (comment_directive | preamble_directive | string_directive | entry_directive) }
//! bib = _{ SOI ~ junk ~ (directive ~ junk)* ~ EOI }
//! ```
//!
//! ## Recovery
//! The parser also accepts the following, none of which match the grammar above.
//! 1. A missing comma between two fields, as in `a = "1" b = "2"`. The value of `a` carries a
//!    [`ContentError`](crate::ContentError) and `b` is still read.
//! 2. Bare tokens after the citation key, such as `extra` in `@misc{k, extra, t = 1}`. These are
//!    dropped, or reported according to [`BareTokenPolicy`](crate::BareTokenPolicy).
//! 3. An empty value, as in `t = ,`.
//! 4. Trailing text in a preamble after its value, which is skipped.
//! 5. `%` comments between `@` and the opening bracket of a directive.
//!
//! Operands written side by side without `#`, such as `{a} {b}`, are also accepted, but the
//! second operand is replaced by a [`ContentError`](crate::ContentError).
use pest_derive::Parser;

/// A pest parser generated from the grammar above.
#[derive(Parser)]
#[grammar = "syntax/bibtex.pest"] // relative to src
pub struct BibtexParser;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    fn count(input: &str, rule: Rule) -> usize {
        BibtexParser::parse(Rule::bib, input)
            .unwrap()
            .filter(|pair| pair.as_rule() == rule)
            .count()
    }

    #[test]
    fn test_parse() {
        let input = r#"
            free text, 100% prose
            @article (2:k,
               et= { Text} #
                1234,
            )
            @article {??,1={T} # var,}
            @article {??,1={T} # var,title = "{"}"}
            @a{k}
            @string{k=1234}
            @string{k=1 # {Text} # var,}
            @string()
            @comment{{bal}{anced@@@}}
            @COMMENT( a {)} )
            @preamble{ {Text} # expand # {"}}
        "#;

        assert!(BibtexParser::parse(Rule::bib, input).is_ok());
        assert_eq!(count(input, Rule::entry_directive), 4);
        assert_eq!(count(input, Rule::string_directive), 3);
        assert_eq!(count(input, Rule::comment_directive), 2);
        assert_eq!(count(input, Rule::preamble_directive), 1);
    }

    #[test]
    fn test_reject() {
        for input in [
            "@article{k, a = \"1\" b = \"2\"}",
            "@article{k, title = {T}",
            "@article{, title = {T}}",
            "@string{a}",
            "@misc{k, t = {a} {b}}",
            "@misc{k, extra, t = 1}",
        ] {
            assert!(BibtexParser::parse(Rule::bib, input).is_err(), "{input}");
        }
    }

    #[test]
    fn test_agrees_with_parser() {
        let input = r#"
            @string{pub = "Publisher"}
            @book{key, publisher = pub # ", " # {City}, year = 2014}
            Prices rose 5% in 2015.
            @misc{pct, note = 50%,
              % year = {2014},
              year = 2015}
            @inproceedings(other, title = {A (parenthesized) title})
            @comment{name@example.com}
        "#;

        let doc = crate::parse(input).unwrap();
        assert!(doc.content_errors().is_empty());
        assert_eq!(count(input, Rule::entry_directive), doc.entries.len());
        assert_eq!(count(input, Rule::comment_directive), doc.comments.len());
    }
}
