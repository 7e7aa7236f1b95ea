use crate::{
    ast::{ColumnDefinition, ObjectName},
    catalog::{ColumnRecord, SqlType, TypeCatalog},
    model::{ColumnSource, JsonColumnInfo, ObjectReference, ResultColumn},
};

/// Resolved facts for one column of an aliased object. Real tables, views, functions,
/// table variables, CTEs and derived tables all describe their columns this way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSourceInfo {
    pub name: String,
    pub source: Option<ColumnSource>,
    pub sql_type: Option<SqlType>,
    pub user_type: Option<ObjectName>,
    pub is_nullable: Option<bool>,
    pub reference: Option<ObjectReference>,
    pub json: Option<JsonColumnInfo>,
    pub children: Vec<ResultColumn>,
}

impl ColumnSourceInfo {
    /// Column described by a metadata record; `source` carries the owning object.
    pub fn from_record(record: &ColumnRecord, catalog: &TypeCatalog, source: &ColumnSource) -> Self {
        let descriptor = catalog.resolve_column(record);
        Self {
            name: record.name.clone(),
            source: Some(ColumnSource { column: Some(record.name.clone()), ..source.clone() }),
            sql_type: Some(descriptor.sql_type),
            user_type: descriptor.user_type,
            is_nullable: descriptor.is_nullable,
            ..Default::default()
        }
    }

    /// Column declared inline, as in `DECLARE @t TABLE (...)`. Undeclared nullability means nullable.
    pub fn from_definition(definition: &ColumnDefinition, catalog: &TypeCatalog, owner: &str) -> Self {
        let descriptor = catalog.resolve_data_type(&definition.data_type);
        Self {
            name: definition.name.clone(),
            source: Some(ColumnSource {
                schema: None,
                table: Some(owner.to_string()),
                column: Some(definition.name.clone()),
                object_kind: None,
            }),
            sql_type: Some(descriptor.sql_type),
            user_type: descriptor.user_type,
            is_nullable: Some(definition.nullable.unwrap_or(true)),
            ..Default::default()
        }
    }

    /// Column projected by a nested query (CTE, derived table, SELECT INTO).
    pub fn from_column(column: &ResultColumn, name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: column.source.clone(),
            sql_type: column.sql_type.clone(),
            user_type: column.user_type.clone(),
            is_nullable: column.is_nullable,
            reference: column.reference.clone(),
            json: column.json.clone(),
            children: column.children.clone(),
        }
    }

    pub fn with_reference(mut self, reference: ObjectReference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Projected column read through `alias_table`.
    pub fn project(&self, alias_table: &str, force_nullable: bool) -> ResultColumn {
        ResultColumn {
            name: self.name.clone(),
            alias_table: Some(alias_table.to_string()),
            source: self.source.clone(),
            sql_type: self.sql_type.clone(),
            user_type: self.user_type.clone(),
            is_nullable: if force_nullable { Some(true) } else { self.is_nullable },
            reference: self.reference.clone(),
            json: self.json.clone(),
            children: self.children.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::DataTypeRef, config::AnalyzerConfig, model::ObjectKind};

    #[test]
    fn test_record_keeps_owner_and_type() {
        let catalog = TypeCatalog::empty(&AnalyzerConfig::default());
        let owner = ColumnSource {
            schema: Some("dbo".into()),
            table: Some("Orders".into()),
            column: None,
            object_kind: Some(ObjectKind::Table),
        };
        let info = ColumnSourceInfo::from_record(&ColumnRecord::new("Total", "decimal", false).with_precision(10, 2), &catalog, &owner);
        assert_eq!(info.source.as_ref().and_then(|s| s.column.as_deref()), Some("Total"));
        assert_eq!(info.sql_type.as_ref().map(SqlType::render).as_deref(), Some("decimal(10,2)"));
        assert_eq!(info.is_nullable, Some(false));

        let projected = info.project("o", true);
        assert_eq!(projected.is_nullable, Some(true));
        assert_eq!(projected.alias_table.as_deref(), Some("o"));
    }

    #[test]
    fn test_definition_defaults_to_nullable() {
        let catalog = TypeCatalog::empty(&AnalyzerConfig::default());
        let definition = ColumnDefinition::new("Code", DataTypeRef::new("varchar").with_length(10), None);
        let info = ColumnSourceInfo::from_definition(&definition, &catalog, "@codes");
        assert_eq!(info.is_nullable, Some(true));
        assert_eq!(info.source.and_then(|s| s.table).as_deref(), Some("@codes"));
    }
}
