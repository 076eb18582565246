use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, ErrorCode, Result};
use crate::macros::MacroTable;
use crate::parse::TokenPart;
use crate::value::{ContentError, Value};

/// What to do with a bare token which follows the citation key, such as `extra` in
/// `@misc{key, extra, title = {T}}`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BareTokenPolicy {
    /// Silently drop the token.
    #[default]
    Ignore,
    /// Record a [`ContentError`] in [`Entry::diagnostics`].
    Report,
}

/// A bibliographic entry such as `@article{key, title = {Title}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// The lowercased entry type, e.g. `article`.
    pub entry_type: String,
    /// The citation key as written.
    pub citation_key: String,
    /// The lowercased citation key.
    pub citation_key_normalized: String,
    /// Tag values keyed by lowercased tag name.
    pub tags: HashMap<String, Value>,
    /// Content errors which do not belong to any single tag.
    pub diagnostics: Vec<ContentError>,
}

impl Entry {
    /// Get a tag value, ignoring case.
    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.tags.get(&tag.to_lowercase())
    }
}

/// The result of parsing a bibliography.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub entries: Vec<Entry>,
    pub macros: MacroTable,
    pub preambles: Vec<Value>,
    pub comments: Vec<String>,
}

impl Document {
    /// Find an entry by citation key, ignoring case.
    pub fn entry(&self, citation_key: &str) -> Option<&Entry> {
        let normalized = citation_key.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.citation_key_normalized == normalized)
    }

    /// Expand the value of `tag` in `entry` using the macros of this document.
    ///
    /// Returns `None` if the entry has no such tag.
    pub fn resolve_tag(&self, entry: &Entry, tag: &str) -> Option<Result<String>> {
        entry.get(tag).map(|value| self.macros.resolve(value.parts()))
    }

    /// Every content error embedded in the document, in source order within each entry.
    pub fn content_errors(&self) -> Vec<&ContentError> {
        let mut errors = Vec::new();
        for entry in self.entries.iter() {
            errors.extend(entry.diagnostics.iter());
            for value in entry.tags.values() {
                errors.extend(value.errors());
            }
        }
        for (_, value) in self.macros.iter() {
            errors.extend(value.errors());
        }
        for value in self.preambles.iter() {
            errors.extend(value.errors());
        }
        errors
    }

    /// Escalate the first embedded content error, if any.
    pub fn check_strict(&self) -> Result<()> {
        match self.content_errors().first() {
            Some(&err) => Err(Error::content(err.clone())),
            None => Ok(()),
        }
    }
}

/// Assemble an entry from the parts of its body.
///
/// The first key is the citation key. Later tags replace earlier tags with the same name.
pub(crate) fn build_entry(
    entry_type: &str,
    parts: Vec<TokenPart<'_>>,
    policy: BareTokenPolicy,
    pos: usize,
) -> Result<Entry> {
    let mut citation_key = None;
    let mut tags = HashMap::new();
    let mut diagnostics = Vec::new();

    for part in parts {
        match part {
            TokenPart::Key(key) if citation_key.is_none() => citation_key = Some(key.into_owned()),
            TokenPart::Key(key) => match policy {
                BareTokenPolicy::Ignore => {
                    debug!(entry_type, token = %key, "dropping extra bare token");
                }
                BareTokenPolicy::Report => {
                    diagnostics.push(ContentError::extra_bare_token(&key));
                }
            },
            TokenPart::Tag { name, value } => {
                tags.insert(name.to_lowercase(), value);
            }
        }
    }

    let citation_key =
        citation_key.ok_or_else(|| Error::syntax(ErrorCode::MissingCitationKey, pos))?;

    Ok(Entry {
        entry_type: entry_type.to_lowercase(),
        citation_key_normalized: citation_key.to_lowercase(),
        citation_key,
        tags,
        diagnostics,
    })
}

/// Collect the macro definitions of a `@string` body. Bare keys are ignored.
pub(crate) fn build_strings(parts: Vec<TokenPart<'_>>) -> MacroTable {
    let mut strings = MacroTable::new();
    for part in parts {
        if let TokenPart::Tag { name, value } = part {
            strings.insert(&name, value);
        }
    }
    strings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValuePart;
    use std::borrow::Cow;

    fn parts() -> Vec<TokenPart<'static>> {
        vec![
            TokenPart::Key(Cow::Borrowed("Key1")),
            TokenPart::Tag {
                name: Cow::Borrowed("Title"),
                value: Value(vec![ValuePart::quoted("first")]),
            },
            TokenPart::Key(Cow::Borrowed("extra")),
            TokenPart::Tag {
                name: Cow::Borrowed("TITLE"),
                value: Value(vec![ValuePart::quoted("second")]),
            },
        ]
    }

    #[test]
    fn test_build_entry() {
        let entry = build_entry("Article", parts(), BareTokenPolicy::Ignore, 0).unwrap();
        assert_eq!(entry.entry_type, "article");
        assert_eq!(entry.citation_key, "Key1");
        assert_eq!(entry.citation_key_normalized, "key1");
        assert_eq!(entry.tags.len(), 1);
        assert_eq!(
            entry.get("title"),
            Some(&Value(vec![ValuePart::quoted("second")]))
        );
        assert!(entry.diagnostics.is_empty());
    }

    #[test]
    fn test_report_bare_token() {
        let entry = build_entry("misc", parts(), BareTokenPolicy::Report, 0).unwrap();
        assert_eq!(
            entry.diagnostics,
            vec![ContentError::extra_bare_token("extra")]
        );
    }

    #[test]
    fn test_missing_key() {
        let parts = vec![TokenPart::Tag {
            name: Cow::Borrowed("title"),
            value: Value::default(),
        }];
        let err = build_entry("misc", parts, BareTokenPolicy::Ignore, 7).unwrap_err();
        assert_eq!(err.code(), &ErrorCode::MissingCitationKey);
        assert_eq!(err.position(), Some(7));
    }

    #[test]
    fn test_build_strings() {
        let strings = build_strings(parts());
        assert_eq!(strings.len(), 1);
        assert_eq!(
            strings.get("title"),
            Some(&Value(vec![ValuePart::quoted("second")]))
        );
    }

    #[test]
    fn test_check_strict() {
        let mut doc = Document::default();
        assert_eq!(doc.check_strict(), Ok(()));

        doc.preambles.push(Value(vec![ValuePart::Error(
            ContentError::missing_comma("b"),
        )]));
        let err = doc.check_strict().unwrap_err();
        assert_eq!(
            err.code(),
            &ErrorCode::Content(ContentError::missing_comma("b"))
        );
    }
}
