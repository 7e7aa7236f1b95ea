use std::collections::{HashMap, HashSet};

use crate::{
    analyzer::{AnalyzerError, ColumnMap, RoutineBindings, ScopeStack},
    ast::Cte,
    catalog::TypeCatalog,
    config::AnalyzerConfig,
};

/// Mutable state of one routine's analysis. Owned by a single builder and never shared
/// across threads; only the catalog is shared.
pub struct AnalysisContext<'a> {
    pub catalog: &'a TypeCatalog,
    pub config: &'a AnalyzerConfig,
    pub scopes: ScopeStack,
    pub bindings: RoutineBindings,
    cte_frames: Vec<Vec<Cte>>,
    /// (statement sequence, lowercase CTE name) -> columns
    cte_cache: HashMap<(usize, String), ColumnMap>,
    cte_anchors: HashMap<String, ColumnMap>,
    ctes_in_progress: HashSet<String>,
    statement: usize,
    depth: usize,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(catalog: &'a TypeCatalog, config: &'a AnalyzerConfig) -> Self {
        Self {
            catalog,
            config,
            scopes: ScopeStack::new(),
            bindings: RoutineBindings::new(),
            cte_frames: Vec::new(),
            cte_cache: HashMap::new(),
            cte_anchors: HashMap::new(),
            ctes_in_progress: HashSet::new(),
            statement: 0,
            depth: 0,
        }
    }

    pub fn default_schema(&self) -> &str {
        &self.config.default_schema
    }

    /// Starts a new statement; CTE columns computed for earlier statements are not reused.
    pub fn next_statement(&mut self) {
        self.statement += 1;
    }

    pub fn enter(&mut self) -> Result<(), AnalyzerError> {
        if self.depth >= self.config.max_nesting_depth {
            return Err(AnalyzerError::NestingTooDeep { depth: self.config.max_nesting_depth });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn push_ctes(&mut self, ctes: &[Cte]) {
        self.cte_frames.push(ctes.to_vec());
    }

    pub fn pop_ctes(&mut self) {
        self.cte_frames.pop();
    }

    pub fn find_cte(&self, name: &str) -> Option<Cte> {
        self.cte_frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|cte| cte.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn cached_cte(&self, name: &str) -> Option<ColumnMap> {
        self.cte_cache.get(&(self.statement, name.to_ascii_lowercase())).cloned()
    }

    pub fn cache_cte(&mut self, name: &str, columns: ColumnMap) {
        self.cte_cache.insert((self.statement, name.to_ascii_lowercase()), columns);
    }

    /// Marks a CTE as being computed; `false` when it already is (a recursive reference).
    pub fn begin_cte(&mut self, name: &str) -> bool {
        self.ctes_in_progress.insert(name.to_ascii_lowercase())
    }

    pub fn end_cte(&mut self, name: &str) {
        let key = name.to_ascii_lowercase();
        self.ctes_in_progress.remove(&key);
        self.cte_anchors.remove(&key);
    }

    pub fn set_cte_anchor(&mut self, name: &str, columns: ColumnMap) {
        self.cte_anchors.insert(name.to_ascii_lowercase(), columns);
    }

    pub fn cte_anchor(&self, name: &str) -> Option<ColumnMap> {
        self.cte_anchors.get(&name.to_ascii_lowercase()).cloned()
    }
}
