use std::collections::HashMap;

use crate::{analyzer::ColumnMap, catalog::TypeDescriptor};

/// Per-routine variable bindings: scalar variables and parameters, plus table variables,
/// table-valued parameters and temp tables with their column sets.
#[derive(Debug, Clone, Default)]
pub struct RoutineBindings {
    scalars: HashMap<String, TypeDescriptor>,
    tables: HashMap<String, ColumnMap>,
}

impl RoutineBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_scalar(&mut self, name: &str, descriptor: TypeDescriptor) {
        self.scalars.insert(name.to_ascii_lowercase(), descriptor);
    }

    pub fn scalar(&self, name: &str) -> Option<&TypeDescriptor> {
        self.scalars.get(&name.to_ascii_lowercase())
    }

    /// Later bindings replace earlier ones, as a re-created temp table would.
    pub fn bind_table(&mut self, name: &str, columns: ColumnMap) {
        self.tables.insert(name.to_ascii_lowercase(), columns);
    }

    pub fn table(&self, name: &str) -> Option<&ColumnMap> {
        self.tables.get(&name.to_ascii_lowercase())
    }
}
