use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    ast::ObjectName,
    catalog::{CatalogError, ColumnRecord, ColumnSetRecord, MetadataProvider, ScalarTypeRecord, TableRecord, TypeDescriptor},
    model::ObjectKind,
};

#[derive(Deserialize, Default)]
struct SnapshotDocument {
    #[serde(default)]
    scalar_types: Vec<Value>,
    #[serde(default)]
    tables: Vec<Value>,
    #[serde(default)]
    functions: Vec<Value>,
    #[serde(default)]
    table_types: Vec<Value>,
}

/// In-memory metadata store, populated once and read-only afterwards.
///
/// Records are keyed by lowercase `schema.name` and, when they carry a catalog, also by
/// `catalog.schema.name`.
#[derive(Debug, Default, Clone)]
pub struct MetadataSnapshot {
    scalar_types: HashMap<String, ScalarTypeRecord>,
    tables: HashMap<String, TableRecord>,
    functions: HashMap<String, ColumnSetRecord>,
    table_types: HashMap<String, ColumnSetRecord>,
    skipped: usize,
}

fn key(schema: &str, name: &str) -> String {
    format!("{}.{}", schema, name).to_ascii_lowercase()
}

fn catalog_key(catalog: &str, schema: &str, name: &str) -> String {
    format!("{}.{}.{}", catalog, schema, name).to_ascii_lowercase()
}

impl MetadataSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a snapshot document. Records that fail to decode are skipped.
    pub fn from_json(document: Value) -> Result<Self, CatalogError> {
        let document: SnapshotDocument = serde_json::from_value(document)
            .map_err(|err| CatalogError::Json { path: "<memory>".into(), message: err.to_string() })?;

        let mut snapshot = Self::new();
        for record in Self::decode_all::<ScalarTypeRecord>("scalar type", document.scalar_types, &mut snapshot.skipped) {
            snapshot.add_scalar_type(record);
        }
        for record in Self::decode_all::<TableRecord>("table", document.tables, &mut snapshot.skipped) {
            snapshot.add_table(record);
        }
        for record in Self::decode_all::<ColumnSetRecord>("function", document.functions, &mut snapshot.skipped) {
            snapshot.add_function(record);
        }
        for record in Self::decode_all::<ColumnSetRecord>("table type", document.table_types, &mut snapshot.skipped) {
            snapshot.add_table_type(record);
        }

        tracing::debug!(
            scalar_types = snapshot.scalar_types.len(),
            tables = snapshot.tables.len(),
            functions = snapshot.functions.len(),
            table_types = snapshot.table_types.len(),
            skipped = snapshot.skipped,
            "metadata snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|err| CatalogError::Io { path: display.clone(), message: err.to_string() })?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|err| CatalogError::Json { path: display.clone(), message: err.to_string() })?;
        Self::from_json(document).map_err(|err| match err {
            CatalogError::Json { message, .. } => CatalogError::Json { path: display, message },
            other => other,
        })
    }

    fn decode_all<T: DeserializeOwned>(kind: &'static str, values: Vec<Value>, skipped: &mut usize) -> Vec<T> {
        let mut records = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(err) => {
                    *skipped += 1;
                    let error = CatalogError::InvalidRecord { kind, index, message: err.to_string() };
                    tracing::warn!("{}", error);
                }
            }
        }
        records
    }

    pub fn add_scalar_type(&mut self, record: ScalarTypeRecord) {
        if let Some(catalog) = &record.catalog {
            self.scalar_types.insert(catalog_key(catalog, &record.schema, &record.name), record.clone());
        }
        self.scalar_types.insert(key(&record.schema, &record.name), record);
    }

    pub fn add_table(&mut self, record: TableRecord) {
        if let Some(catalog) = &record.catalog {
            self.tables.insert(catalog_key(catalog, &record.schema, &record.name), record.clone());
        }
        self.tables.insert(key(&record.schema, &record.name), record);
    }

    pub fn add_function(&mut self, record: ColumnSetRecord) {
        self.functions.insert(key(&record.schema, &record.name), record);
    }

    pub fn add_table_type(&mut self, record: ColumnSetRecord) {
        self.table_types.insert(key(&record.schema, &record.name), record);
    }

    pub fn with_table(mut self, schema: &str, name: &str, columns: Vec<ColumnRecord>) -> Self {
        self.add_table(TableRecord { catalog: None, schema: schema.into(), name: name.into(), is_view: false, columns });
        self
    }

    pub fn with_view(mut self, schema: &str, name: &str, columns: Vec<ColumnRecord>) -> Self {
        self.add_table(TableRecord { catalog: None, schema: schema.into(), name: name.into(), is_view: true, columns });
        self
    }

    pub fn with_function(mut self, schema: &str, name: &str, columns: Vec<ColumnRecord>) -> Self {
        self.add_function(ColumnSetRecord { schema: schema.into(), name: name.into(), columns });
        self
    }

    pub fn with_table_type(mut self, schema: &str, name: &str, columns: Vec<ColumnRecord>) -> Self {
        self.add_table_type(ColumnSetRecord { schema: schema.into(), name: name.into(), columns });
        self
    }

    pub fn with_scalar_type(mut self, record: ScalarTypeRecord) -> Self {
        self.add_scalar_type(record);
        self
    }

    /// Number of records dropped while loading.
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }

    fn table(&self, schema: &str, name: &str, catalog: Option<&str>) -> Option<&TableRecord> {
        catalog
            .and_then(|catalog| self.tables.get(&catalog_key(catalog, schema, name)))
            .or_else(|| self.tables.get(&key(schema, name)))
    }
}

impl MetadataProvider for MetadataSnapshot {
    fn lookup_table_columns(&self, schema: &str, name: &str, catalog: Option<&str>) -> Option<Vec<ColumnRecord>> {
        self.table(schema, name, catalog).map(|table| table.columns.clone())
    }

    fn lookup_function_columns(&self, schema: &str, name: &str) -> Option<Vec<ColumnRecord>> {
        self.functions.get(&key(schema, name)).map(|function| function.columns.clone())
    }

    fn lookup_table_type_columns(&self, schema: &str, name: &str) -> Option<Vec<ColumnRecord>> {
        self.table_types.get(&key(schema, name)).map(|table_type| table_type.columns.clone())
    }

    fn lookup_scalar_type(&self, type_ref: &ObjectName) -> Option<TypeDescriptor> {
        let schema = type_ref.schema.as_deref()?;
        let record = match &type_ref.catalog {
            Some(catalog) => self.scalar_types.get(&catalog_key(catalog, schema, &type_ref.name)),
            None => self.scalar_types.get(&key(schema, &type_ref.name)),
        };
        record.map(ScalarTypeRecord::descriptor)
    }

    fn lookup_object_kind(&self, schema: &str, name: &str, catalog: Option<&str>) -> Option<ObjectKind> {
        self.table(schema, name, catalog)
            .map(|table| if table.is_view { ObjectKind::View } else { ObjectKind::Table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn document() -> Value {
        json!({
            "scalar_types": [
                { "schema": "dbo", "name": "Email", "base_type": "nvarchar", "max_length": 320, "is_nullable": false },
                { "schema": "dbo", "name": "Broken" }
            ],
            "tables": [
                { "schema": "dbo", "name": "Orders", "columns": [
                    { "name": "Id", "type_name": "int", "is_nullable": false },
                    { "name": "Total", "type_name": "decimal", "precision": 10, "scale": 2 }
                ]},
                { "schema": "dbo", "name": "ActiveOrders", "is_view": true, "columns": [] },
                "not a record"
            ],
            "functions": [
                { "schema": "dbo", "name": "fn_Lines", "columns": [ { "name": "LineId", "type_name": "int" } ] }
            ],
            "table_types": [
                { "schema": "dbo", "name": "IdList", "columns": [ { "name": "Id", "type_name": "int", "is_nullable": false } ] }
            ]
        })
    }

    #[test]
    fn test_corrupt_records_are_skipped() {
        let snapshot = MetadataSnapshot::from_json(document()).unwrap();
        assert_eq!(snapshot.skipped_records(), 2);
        assert!(snapshot.lookup_table_columns("dbo", "Orders", None).is_some());
        assert!(snapshot.lookup_scalar_type(&ObjectName::qualified("dbo", "Broken")).is_none());
    }

    #[test]
    fn test_lookups_are_case_insensitive() {
        let snapshot = MetadataSnapshot::from_json(document()).unwrap();
        let columns = snapshot.lookup_table_columns("DBO", "orders", None).unwrap();
        assert_eq!(columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Id", "Total"]);
        assert!(snapshot.lookup_function_columns("dbo", "FN_LINES").is_some());
        assert!(snapshot.lookup_table_type_columns("dbo", "idlist").is_some());
        assert_eq!(snapshot.lookup_object_kind("dbo", "ActiveOrders", None), Some(ObjectKind::View));
        assert_eq!(snapshot.lookup_object_kind("dbo", "Orders", None), Some(ObjectKind::Table));
    }

    #[test]
    fn test_catalog_qualified_table_falls_back_to_schema_key() {
        let snapshot = MetadataSnapshot::from_json(document()).unwrap();
        assert!(snapshot.lookup_table_columns("dbo", "Orders", Some("Shop")).is_some());
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("metadata.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(document().to_string().as_bytes()).unwrap();

        let snapshot = MetadataSnapshot::load_file(&file_path).unwrap();
        let email = snapshot.lookup_scalar_type(&ObjectName::qualified("dbo", "Email")).unwrap();
        assert_eq!(email.sql_type.render(), "nvarchar(320)");
    }

    #[test]
    fn test_load_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(MetadataSnapshot::load_file(&missing), Err(CatalogError::Io { .. })));

        let invalid = temp_dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").unwrap();
        assert!(matches!(MetadataSnapshot::load_file(&invalid), Err(CatalogError::Json { .. })));
    }
}
