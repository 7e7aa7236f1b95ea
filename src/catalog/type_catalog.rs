use std::{path::Path, sync::Arc};

use crate::{
    ast::{DataTypeRef, ObjectName},
    catalog::{CatalogError, ColumnRecord, MetadataProvider, MetadataSnapshot, SqlType, TypeDescriptor},
    config::AnalyzerConfig,
    model::ObjectKind,
};

/// Type and column metadata used during analysis, backed by a read-only provider.
pub struct TypeCatalog {
    provider: Arc<dyn MetadataProvider>,
    default_schema: String,
    system_schema: String,
}

impl TypeCatalog {
    pub fn new(provider: Arc<dyn MetadataProvider>, config: &AnalyzerConfig) -> Self {
        Self {
            provider,
            default_schema: config.default_schema.clone(),
            system_schema: config.system_schema.clone(),
        }
    }

    pub fn from_snapshot(snapshot: MetadataSnapshot, config: &AnalyzerConfig) -> Self {
        Self::new(Arc::new(snapshot), config)
    }

    pub fn load_snapshot_file(path: impl AsRef<Path>, config: &AnalyzerConfig) -> Result<Self, CatalogError> {
        Ok(Self::from_snapshot(MetadataSnapshot::load_file(path)?, config))
    }

    /// A catalog that knows only built-in types.
    pub fn empty(config: &AnalyzerConfig) -> Self {
        Self::from_snapshot(MetadataSnapshot::new(), config)
    }

    /// The same metadata, with unqualified names resolving against `default_schema`.
    pub fn with_default_schema(&self, default_schema: &str) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            default_schema: default_schema.to_string(),
            system_schema: self.system_schema.clone(),
        }
    }

    /// Resolves a type reference to a concrete type.
    ///
    /// System-schema and unqualified built-in names are normalized directly; anything else is
    /// looked up catalog-qualified first, then schema-qualified. Caller facets win over the
    /// facets stored with a user-defined type. `None` when the name is unknown.
    pub fn resolve(&self, type_ref: &ObjectName, max_length: Option<i32>, precision: Option<u8>, scale: Option<u8>) -> Option<TypeDescriptor> {
        let is_system = type_ref
            .schema
            .as_deref()
            .is_some_and(|schema| schema.eq_ignore_ascii_case(&self.system_schema));
        if is_system || (type_ref.schema.is_none() && SqlType::is_builtin(&type_ref.name)) {
            return Some(TypeDescriptor::of(SqlType::builtin(&type_ref.name, max_length, precision, scale)));
        }

        let schema = type_ref.schema.clone().unwrap_or_else(|| self.default_schema.clone());
        let schema_qualified = ObjectName { catalog: None, schema: Some(schema), name: type_ref.name.clone() };
        let found = type_ref
            .catalog
            .as_ref()
            .and_then(|catalog| self.provider.lookup_scalar_type(&schema_qualified.clone().with_catalog(catalog.clone())))
            .or_else(|| self.provider.lookup_scalar_type(&schema_qualified));

        found.map(|mut descriptor| {
            if max_length.is_some() {
                descriptor.sql_type.max_length = max_length;
            }
            if precision.is_some() {
                descriptor.sql_type.precision = precision;
            }
            if scale.is_some() {
                descriptor.sql_type.scale = scale;
            }
            descriptor
        })
    }

    /// Like [`TypeCatalog::resolve`], passing an unknown name through verbatim.
    pub fn resolve_data_type(&self, data_type: &DataTypeRef) -> TypeDescriptor {
        self.resolve(&data_type.name, data_type.length, data_type.precision, data_type.scale)
            .unwrap_or_else(|| {
                tracing::debug!(type_name = %data_type.name, "unresolved type reference kept as opaque name");
                let mut sql_type = SqlType::opaque(data_type.name.to_string());
                sql_type.max_length = data_type.length;
                sql_type.precision = data_type.precision;
                sql_type.scale = data_type.scale;
                TypeDescriptor::of(sql_type)
            })
    }

    /// Type facts for a stored column; the column's own nullability wins.
    pub fn resolve_column(&self, record: &ColumnRecord) -> TypeDescriptor {
        let data_type = DataTypeRef {
            name: record.type_name(),
            length: record.max_length,
            precision: record.precision,
            scale: record.scale,
        };
        let mut descriptor = self.resolve_data_type(&data_type);
        descriptor.is_nullable = Some(record.is_nullable);
        descriptor
    }

    fn schema_of<'a>(&'a self, name: &'a ObjectName) -> &'a str {
        name.schema.as_deref().unwrap_or(&self.default_schema)
    }

    pub fn table_columns(&self, name: &ObjectName) -> Option<Vec<ColumnRecord>> {
        self.provider.lookup_table_columns(self.schema_of(name), &name.name, name.catalog.as_deref())
    }

    pub fn function_columns(&self, name: &ObjectName) -> Option<Vec<ColumnRecord>> {
        self.provider.lookup_function_columns(self.schema_of(name), &name.name)
    }

    pub fn table_type_columns(&self, name: &ObjectName) -> Option<Vec<ColumnRecord>> {
        self.provider.lookup_table_type_columns(self.schema_of(name), &name.name)
    }

    pub fn object_kind(&self, name: &ObjectName) -> Option<ObjectKind> {
        self.provider.lookup_object_kind(self.schema_of(name), &name.name, name.catalog.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarTypeRecord;

    fn catalog() -> TypeCatalog {
        let snapshot = MetadataSnapshot::new()
            .with_scalar_type(ScalarTypeRecord {
                catalog: None,
                schema: "dbo".into(),
                name: "Amount".into(),
                base_type: "decimal".into(),
                max_length: None,
                precision: Some(18),
                scale: Some(4),
                is_nullable: None,
            })
            .with_scalar_type(ScalarTypeRecord {
                catalog: Some("Shared".into()),
                schema: "dbo".into(),
                name: "Code".into(),
                base_type: "varchar".into(),
                max_length: Some(12),
                precision: None,
                scale: None,
                is_nullable: Some(false),
            });
        TypeCatalog::from_snapshot(snapshot, &AnalyzerConfig::default())
    }

    #[test]
    fn test_builtin_and_system_types_normalize_directly() {
        let catalog = catalog();
        let resolved = catalog.resolve(&ObjectName::bare("NVARCHAR"), Some(40), None, None).unwrap();
        assert_eq!(resolved.sql_type.render(), "nvarchar(40)");
        assert_eq!(resolved.user_type, None);

        let resolved = catalog.resolve(&ObjectName::qualified("sys", "int"), None, None, None).unwrap();
        assert_eq!(resolved.sql_type, SqlType::int());
    }

    #[test]
    fn test_user_type_merges_caller_facets() {
        let catalog = catalog();
        let stored = catalog.resolve(&ObjectName::bare("Amount"), None, None, None).unwrap();
        assert_eq!(stored.sql_type.render(), "decimal(18,4)");
        assert_eq!(stored.user_type, Some(ObjectName::qualified("dbo", "Amount")));

        let overridden = catalog.resolve(&ObjectName::qualified("dbo", "Amount"), None, Some(10), None).unwrap();
        assert_eq!(overridden.sql_type.render(), "decimal(10,4)");
    }

    #[test]
    fn test_catalog_qualified_lookup_first() {
        let catalog = catalog();
        let name = ObjectName::qualified("dbo", "Code").with_catalog("Shared");
        let resolved = catalog.resolve(&name, None, None, None).unwrap();
        assert_eq!(resolved.sql_type.render(), "varchar(12)");
        assert_eq!(resolved.is_nullable, Some(false));
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let catalog = catalog();
        assert!(catalog.resolve(&ObjectName::qualified("dbo", "Missing"), None, None, None).is_none());
        let descriptor = catalog.resolve_data_type(&DataTypeRef::user("dbo", "Missing").with_length(5));
        assert_eq!(descriptor.sql_type.base_type, "dbo.Missing");
        assert_eq!(descriptor.sql_type.max_length, Some(5));
    }

    #[test]
    fn test_default_schema_override_changes_unqualified_lookups() {
        let catalog = catalog();
        assert!(catalog.resolve(&ObjectName::bare("Amount"), None, None, None).is_some());

        let sales = catalog.with_default_schema("sales");
        assert!(sales.resolve(&ObjectName::bare("Amount"), None, None, None).is_none());
        assert!(sales.resolve(&ObjectName::qualified("dbo", "Amount"), None, None, None).is_some());
    }

    #[test]
    fn test_resolve_column_uses_record_nullability() {
        let catalog = catalog();
        let descriptor = catalog.resolve_column(&ColumnRecord::new("Price", "Amount", false).user_type("dbo"));
        assert_eq!(descriptor.sql_type.render(), "decimal(18,4)");
        assert_eq!(descriptor.is_nullable, Some(false));
    }
}
