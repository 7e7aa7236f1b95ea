use std::ops::Range;

use indexmap::IndexMap;

use crate::{
    analyzer::AliasScopeEntry,
    ast::ColumnRef,
    catalog::TypeCatalog,
    model::ResultColumn,
};

/// Aliases visible at one query level.
#[derive(Debug, Clone, Default)]
pub struct AliasScope {
    /// lowercase lookup key -> entry index
    keys: IndexMap<String, usize>,
    entries: Vec<AliasScopeEntry>,
}

impl AliasScope {
    /// Registers an entry under each key; a key already taken keeps its first owner.
    pub fn add(&mut self, entry: AliasScopeEntry, keys: &[String]) -> usize {
        let index = self.entries.len();
        self.entries.push(entry);
        for key in keys {
            self.keys.entry(key.to_ascii_lowercase()).or_insert(index);
        }
        index
    }

    pub fn entry_index(&self, key: &str) -> Option<usize> {
        self.keys.get(&key.to_ascii_lowercase()).copied()
    }

    pub fn entries(&self) -> &[AliasScopeEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut AliasScopeEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mark_nullable(&mut self, range: Range<usize>) {
        for entry in self.entries.iter_mut().skip(range.start).take(range.len()) {
            entry.mark_nullable();
        }
    }
}

/// Outcome of resolving a column reference against the scope stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLookup {
    Found(ResultColumn),
    Ambiguous,
    Unresolved,
}

/// Alias scopes of the query levels being traversed, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<AliasScope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(AliasScope::default());
        tracing::trace!(depth = self.scopes.len(), "push alias scope");
    }

    pub fn pop(&mut self) -> Option<AliasScope> {
        tracing::trace!(depth = self.scopes.len(), "pop alias scope");
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> Option<&AliasScope> {
        self.scopes.last()
    }

    pub fn current_len(&self) -> usize {
        self.current().map_or(0, AliasScope::len)
    }

    /// Adds to the innermost scope, opening one if the stack is empty.
    pub fn add(&mut self, entry: AliasScopeEntry, keys: &[String]) -> usize {
        if self.scopes.is_empty() {
            self.push();
        }
        let index = self.scopes.len() - 1;
        self.scopes[index].add(entry, keys)
    }

    pub fn mark_nullable(&mut self, range: Range<usize>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.mark_nullable(range);
        }
    }

    pub fn current_entry(&self, index: usize) -> Option<&AliasScopeEntry> {
        self.current().and_then(|scope| scope.entries().get(index))
    }

    /// Finds `qualifier` innermost-first and returns (scope level, entry index).
    fn find_qualifier(&self, qualifier: &str) -> Option<(usize, usize)> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(level, scope)| scope.entry_index(qualifier).map(|index| (level, index)))
    }

    pub fn lookup_column(&mut self, column: &ColumnRef, catalog: &TypeCatalog) -> ColumnLookup {
        match &column.qualifier {
            Some(qualifier) => {
                let key = match &column.schema {
                    Some(schema) => format!("{}.{}", schema, qualifier),
                    None => qualifier.clone(),
                };
                match self.find_qualifier(&key) {
                    Some((level, index)) => {
                        let entry = &mut self.scopes[level].entries[index];
                        entry.ensure_columns(catalog);
                        ColumnLookup::Found(entry.project(&column.name))
                    }
                    None => {
                        tracing::debug!(column = %column, "qualifier not visible in any scope");
                        ColumnLookup::Unresolved
                    }
                }
            }
            None => self.lookup_unqualified(&column.name, catalog),
        }
    }

    fn lookup_unqualified(&mut self, name: &str, catalog: &TypeCatalog) -> ColumnLookup {
        for scope in self.scopes.iter_mut().rev() {
            let mut hits = Vec::new();
            for (index, entry) in scope.entries.iter_mut().enumerate() {
                entry.ensure_columns(catalog);
                if entry.has_column(name) {
                    hits.push(index);
                }
            }
            match hits.as_slice() {
                [] => continue,
                [index] => return ColumnLookup::Found(scope.entries[*index].project(name)),
                _ => return ColumnLookup::Ambiguous,
            }
        }

        // only an entry whose columns are unknown may own a name no scope lists
        let Some(scope) = self.scopes.last() else {
            return ColumnLookup::Unresolved;
        };
        let unknown: Vec<&AliasScopeEntry> = scope.entries.iter().filter(|entry| entry.columns.is_none()).collect();
        match unknown.as_slice() {
            [] => ColumnLookup::Unresolved,
            [entry] => ColumnLookup::Found(entry.project(name)),
            _ => ColumnLookup::Ambiguous,
        }
    }

    /// Expands `*` or `qualifier.*` against the innermost scope. `None` when nothing expands.
    pub fn expand_wildcard(&mut self, qualifier: Option<&str>, catalog: &TypeCatalog) -> Option<Vec<ResultColumn>> {
        let scope = self.scopes.last_mut()?;
        match qualifier {
            Some(qualifier) => {
                let index = scope.entry_index(qualifier)?;
                let entry = &mut scope.entries[index];
                entry.ensure_columns(catalog);
                entry.project_all()
            }
            None => {
                let mut columns = Vec::new();
                let mut expanded_any = false;
                for entry in scope.entries.iter_mut() {
                    entry.ensure_columns(catalog);
                    if let Some(projected) = entry.project_all() {
                        expanded_any = true;
                        columns.extend(projected);
                    }
                }
                expanded_any.then_some(columns)
            }
        }
    }
}
