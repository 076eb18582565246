//! Macro resolution.
//!
//! A value is expanded by concatenating its text parts and recursively expanding its macro
//! references. The names currently being expanded are tracked explicitly, so that a macro which
//! refers back to itself is reported as [`ErrorCode::CyclicMacro`] instead of recursing forever.
//! A name is removed from the set once its expansion finishes, so the same macro may appear any
//! number of times side by side.
use std::collections::HashSet;

use tracing::trace;

use crate::error::{Error, ErrorCode, Result};
use crate::macros::{MacroTable, Variable};
use crate::value::ValuePart;

/// Expand `parts` into a string using the macros in `table`.
///
/// ```
/// use lenient_bibtex::{MacroTable, Value, ValuePart, resolve};
///
/// let mut table = MacroTable::new();
/// table.insert("b", Value(vec![ValuePart::quoted("B")]));
///
/// let parts = [ValuePart::quoted("A"), ValuePart::macro_ref("b"), ValuePart::braced("C")];
/// assert_eq!(resolve(&parts, &table).unwrap(), "ABC");
/// ```
pub fn resolve(parts: &[ValuePart], table: &MacroTable) -> Result<String> {
    let mut resolver = Resolver::new(table);
    let mut out = String::new();
    resolver.expand_into(parts, &mut out)?;
    Ok(out)
}

/// Look up `name`, ignoring case, and expand its value.
pub fn resolve_by_name(name: &str, table: &MacroTable) -> Result<String> {
    let mut resolver = Resolver::new(table);
    let mut out = String::new();
    resolver.expand_macro(name, &mut out)?;
    Ok(out)
}

struct Resolver<'t> {
    table: &'t MacroTable,
    expanding: HashSet<&'t Variable>,
}

impl<'t> Resolver<'t> {
    fn new(table: &'t MacroTable) -> Self {
        Self {
            table,
            expanding: HashSet::new(),
        }
    }

    fn expand_into(&mut self, parts: &[ValuePart], out: &mut String) -> Result<()> {
        for part in parts {
            match part {
                ValuePart::Text { content, .. } => out.push_str(content),
                ValuePart::MacroRef { name } => self.expand_macro(name, out)?,
                ValuePart::Error(err) => out.push_str(&err.message),
            }
        }
        Ok(())
    }

    fn expand_macro(&mut self, name: &str, out: &mut String) -> Result<()> {
        let Some((variable, value)) = self.table.get_key_value(name) else {
            return Err(Error::resolution(ErrorCode::UndefinedMacro(name.to_string())));
        };

        if !self.expanding.insert(variable) {
            return Err(Error::resolution(ErrorCode::CyclicMacro(name.to_string())));
        }

        trace!(name, depth = self.expanding.len(), "expanding macro");
        self.expand_into(value.parts(), out)?;
        self.expanding.remove(variable);
        Ok(())
    }
}
