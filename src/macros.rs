use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use unicase::UniCase;

use crate::error::Result;
use crate::resolve::{resolve, resolve_by_name};
use crate::value::{Value, ValuePart};

/// A macro name, such as `var` in `@string{var = ...}`.
///
/// Names are stored lowercased and compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(UniCase<String>);

impl Variable {
    pub fn new(name: &str) -> Self {
        Self(UniCase::unicode(name.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl AsRef<str> for Variable {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// The macros defined by `@string` directives.
///
/// Values are stored exactly as parsed: references to other macros are only expanded on demand by
/// [`MacroTable::resolve`]. Inserting a name which is already present replaces the previous
/// value, and [`MacroTable::merge`] follows the same rule, so a later definition always wins.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MacroTable {
    map: HashMap<Variable, Value>,
}

const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

impl MacroTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table containing only the month macros.
    pub fn with_month_macros() -> Self {
        let mut table = Self::new();
        table.set_month_macros();
        table
    }

    /// Set "month macros", such as `@string{apr = {April}}`.
    pub fn set_month_macros(&mut self) {
        for (name, month) in MONTHS {
            self.insert(name, Value(vec![ValuePart::braced(month)]));
        }
    }

    /// Insert a macro, returning the value it replaced.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        self.map.insert(Variable::new(name), value)
    }

    /// Get the value of a macro, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(&Variable::new(name))
    }

    pub(crate) fn get_key_value(&self, name: &str) -> Option<(&Variable, &Value)> {
        self.map.get_key_value(&Variable::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&Variable::new(name))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the lowercased names and their values, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Merge `other` into this table. On a name collision the value from `other` wins.
    pub fn merge(&mut self, other: MacroTable) {
        self.map.extend(other.map);
    }

    /// Expand `parts` into a string using the macros in this table.
    pub fn resolve(&self, parts: &[ValuePart]) -> Result<String> {
        resolve(parts, self)
    }

    /// Expand the macro `name`.
    pub fn resolve_by_name(&self, name: &str) -> Result<String> {
        resolve_by_name(name, self)
    }

    pub fn into_inner(self) -> HashMap<String, Value> {
        self.map
            .into_iter()
            .map(|(Variable(name), value)| (name.into_inner(), value))
            .collect()
    }
}

impl Serialize for MacroTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_month() {
        let table = MacroTable::with_month_macros();
        assert_eq!(table.len(), 12);

        assert_eq!(
            table.get("feb"),
            Some(&Value(vec![ValuePart::braced("February")]))
        );
        assert_eq!(
            table.get("dec"),
            Some(&Value(vec![ValuePart::braced("December")]))
        );
    }

    #[test]
    fn test_case_insensitive() {
        let mut table = MacroTable::new();
        table.insert("ss", Value(vec![ValuePart::quoted("0")]));
        table.insert("ß", Value(vec![ValuePart::quoted("1")]));
        table.insert("SS", Value(vec![ValuePart::quoted("2")]));

        assert_eq!(table.len(), 1);
        for name in ["ss", "ß", "SS", "sS"] {
            assert_eq!(table.get(name), Some(&Value(vec![ValuePart::quoted("2")])));
        }
    }

    #[test]
    fn test_stored_lowercase() {
        let mut table = MacroTable::new();
        table.insert("Mar", Value(vec![ValuePart::quoted("x")]));
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["mar"]);
        assert!(table.contains("MAR"));
    }

    #[test]
    fn test_merge() {
        let mut table = MacroTable::with_month_macros();
        let mut other = MacroTable::new();
        other.insert("JAN", Value(vec![ValuePart::quoted("Jan")]));
        other.insert("new", Value(vec![ValuePart::macro_ref("jan")]));

        table.merge(other);
        assert_eq!(table.len(), 13);
        assert_eq!(table.get("jan"), Some(&Value(vec![ValuePart::quoted("Jan")])));
        assert_eq!(
            table.get("new"),
            Some(&Value(vec![ValuePart::macro_ref("jan")]))
        );
    }

    #[test]
    fn test_into_inner() {
        let inner = MacroTable::with_month_macros().into_inner();
        assert_eq!(inner["may"], Value(vec![ValuePart::braced("May")]));
    }
}
