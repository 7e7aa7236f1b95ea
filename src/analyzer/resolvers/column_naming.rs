use std::collections::HashSet;

use crate::model::ResultColumn;

/// Assigns every column of a result set a name unique within it (case-insensitive).
pub struct ColumnNaming;

impl ColumnNaming {
    /// Alias, else the column's own name, else its source column, alias table or
    /// reference name, else `Column{N}` (1-based position).
    pub fn candidate(column: &ResultColumn, position: usize) -> String {
        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        non_empty(column.alias.as_deref())
            .or_else(|| non_empty(Some(column.name.as_str())))
            .or_else(|| non_empty(column.source_column()))
            .or_else(|| non_empty(column.alias_table.as_deref()))
            .or_else(|| non_empty(column.reference.as_ref().map(|reference| reference.name.as_str())))
            .unwrap_or_else(|| format!("Column{}", position + 1))
    }

    /// Collisions try `{table}_{name}`, `{alias}_{name}`, `{reference}_{name}`, then a
    /// numeric suffix starting at 2.
    pub fn assign(columns: &mut [ResultColumn]) {
        let mut used: HashSet<String> = HashSet::new();
        for (position, column) in columns.iter_mut().enumerate() {
            let base = Self::candidate(column, position);
            let prefixes = [
                column.source_table(),
                column.alias_table.as_deref(),
                column.reference.as_ref().map(|reference| reference.name.as_str()),
            ];
            let mut name = base.clone();
            if used.contains(&name.to_ascii_lowercase()) {
                let prefixed = prefixes
                    .iter()
                    .flatten()
                    .map(|prefix| format!("{}_{}", prefix, base))
                    .find(|candidate| !used.contains(&candidate.to_ascii_lowercase()));
                name = match prefixed {
                    Some(prefixed) => prefixed,
                    None => (2..)
                        .map(|suffix| format!("{}{}", base, suffix))
                        .find(|candidate| !used.contains(&candidate.to_ascii_lowercase()))
                        .unwrap_or(base.clone()),
                };
            }
            used.insert(name.to_ascii_lowercase());
            column.name = name;
        }
    }
}
