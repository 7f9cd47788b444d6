//! Repository layer: read-only, collection-scoped queries.
//!
//! Every restriction goes through `FilterQuery`: column names are
//! compile-time constants and every user-supplied value is a bound
//! parameter. Cells are read through `values` so a badly typed cell
//! becomes a missing value rather than a failed query.

mod appointment;
mod claim;
mod collections;
mod lab_result;
mod staffing;
pub(crate) mod values;

use rusqlite::types::ToSql;

pub use appointment::*;
pub use claim::*;
pub use collections::*;
pub use lab_result::*;
pub use staffing::*;

/// Builds the `WHERE` suffix and its bound parameters.
#[derive(Default)]
pub struct FilterQuery {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, value: Box<dyn ToSql>) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Keeps text cells containing `value` (ASCII case-insensitive) and
    /// every non-text cell. It only ever widens the exact match the typed
    /// predicate applies afterwards, whatever whitespace pads the cell.
    pub fn contains_nocase(
        &mut self,
        column: &'static str,
        value: impl ToSql + 'static,
    ) -> &mut Self {
        let n = self.bind(Box::new(value));
        self.clauses.push(format!(
            "(typeof({column}) != 'text' OR instr(lower({column}), lower(?{n})) > 0)"
        ));
        self
    }

    /// Like `contains_nocase` but case-sensitive and over a set of values;
    /// an empty set matches no row.
    pub fn contains_any<I, V>(&mut self, column: &'static str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: ToSql + 'static,
    {
        let probes: Vec<String> = values
            .into_iter()
            .map(|v| format!("instr({column}, ?{}) > 0", self.bind(Box::new(v))))
            .collect();
        if probes.is_empty() {
            self.never();
        } else {
            self.clauses.push(format!(
                "(typeof({column}) != 'text' OR {})",
                probes.join(" OR ")
            ));
        }
        self
    }

    /// A fixed condition with no user values.
    pub fn raw(&mut self, condition: &'static str) -> &mut Self {
        self.clauses.push(condition.to_string());
        self
    }

    /// Restrict to no rows at all.
    pub fn never(&mut self) -> &mut Self {
        self.raw("0")
    }

    pub fn sql_suffix(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
