use std::{path::Path, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    catalog::{MetadataSnapshot, TypeCatalog},
    config::AnalyzerConfig,
};

/// Publishes one shared [`TypeCatalog`] for the whole process. The first caller loads it;
/// every later caller gets the same instance.
#[derive(Default)]
pub struct CatalogHandle {
    cell: OnceCell<Arc<TypeCatalog>>,
}

impl CatalogHandle {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn get(&self) -> Option<Arc<TypeCatalog>> {
        self.cell.get().cloned()
    }

    pub fn get_or_load<F>(&self, load: F) -> Arc<TypeCatalog>
    where
        F: FnOnce() -> TypeCatalog,
    {
        Arc::clone(self.cell.get_or_init(|| Arc::new(load())))
    }

    /// Loads a snapshot file once. A missing or unreadable file yields a catalog with
    /// built-in types only; the failure is logged, not returned.
    pub fn get_or_load_snapshot(&self, path: impl AsRef<Path>, config: &AnalyzerConfig) -> Arc<TypeCatalog> {
        self.get_or_load(|| match MetadataSnapshot::load_file(path.as_ref()) {
            Ok(snapshot) => TypeCatalog::from_snapshot(snapshot, config),
            Err(err) => {
                tracing::warn!("{}; continuing with built-in types only", err);
                TypeCatalog::empty(config)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ObjectName;
    use tempfile::TempDir;

    #[test]
    fn test_loads_once() {
        let handle = CatalogHandle::new();
        assert!(handle.get().is_none());
        let config = AnalyzerConfig::default();
        let first = handle.get_or_load(|| TypeCatalog::empty(&config));
        let second = handle.get_or_load(|| panic!("loader must not run twice"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_snapshot_degrades_to_builtins() {
        let temp_dir = TempDir::new().unwrap();
        let handle = CatalogHandle::new();
        let catalog = handle.get_or_load_snapshot(temp_dir.path().join("nope.json"), &AnalyzerConfig::default());
        assert!(catalog.table_columns(&ObjectName::qualified("dbo", "Orders")).is_none());
        assert!(catalog.resolve(&ObjectName::bare("int"), None, None, None).is_some());
    }
}
