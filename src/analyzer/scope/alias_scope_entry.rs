use indexmap::IndexMap;

use crate::{
    analyzer::ColumnSourceInfo,
    ast::ObjectName,
    catalog::TypeCatalog,
    model::{ColumnSource, ObjectKind, ResultColumn},
};

/// Column map of an aliased object keyed by lowercase column name, in stored order.
pub type ColumnMap = IndexMap<String, ColumnSourceInfo>;

/// One aliased object visible at a query level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasScopeEntry {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub alias: Option<String>,
    pub object_kind: Option<ObjectKind>,
    /// `None` until resolved, and for objects the metadata store does not know.
    pub columns: Option<ColumnMap>,
    pub is_cte: bool,
    pub force_nullable: bool,
    pub is_function: bool,
    pending: Option<ObjectName>,
}

impl AliasScopeEntry {
    /// Catalog table or view; columns are looked up on first use.
    pub fn table(name: &ObjectName, schema: &str, alias: Option<&str>, object_kind: ObjectKind) -> Self {
        Self {
            catalog: name.catalog.clone(),
            schema: Some(schema.to_string()),
            name: name.name.clone(),
            alias: alias.map(str::to_string),
            object_kind: Some(object_kind),
            pending: Some(ObjectName { schema: Some(schema.to_string()), ..name.clone() }),
            ..Default::default()
        }
    }

    /// Object whose columns are already known (or known to be unknown).
    pub fn resolved(name: impl Into<String>, alias: Option<&str>, columns: Option<ColumnMap>) -> Self {
        Self { name: name.into(), alias: alias.map(str::to_string), columns, ..Default::default() }
    }

    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn cte(mut self) -> Self {
        self.is_cte = true;
        self
    }

    pub fn function(mut self, object_kind: ObjectKind) -> Self {
        self.is_function = true;
        self.object_kind = Some(object_kind);
        self
    }

    /// Copy of this entry visible under another alias.
    pub fn aliased(&self, alias: &str) -> Self {
        Self { alias: Some(alias.to_string()), ..self.clone() }
    }

    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Sets the outer-join flag; it is never cleared.
    pub fn mark_nullable(&mut self) {
        self.force_nullable = true;
    }

    pub fn ensure_columns(&mut self, catalog: &TypeCatalog) {
        let Some(name) = self.pending.take() else {
            return;
        };
        match catalog.table_columns(&name) {
            Some(records) => {
                let owner = self.owner_source();
                let columns = records
                    .iter()
                    .map(|record| (record.name.to_ascii_lowercase(), ColumnSourceInfo::from_record(record, catalog, &owner)))
                    .collect();
                self.columns = Some(columns);
            }
            None => tracing::debug!(table = %name, "no column metadata for table"),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSourceInfo> {
        self.columns.as_ref().and_then(|columns| columns.get(&name.to_ascii_lowercase()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn owner_source(&self) -> ColumnSource {
        ColumnSource {
            schema: self.schema.clone(),
            table: Some(self.name.clone()),
            column: None,
            object_kind: self.object_kind,
        }
    }

    /// Projects a column of this entry. A column the entry does not describe keeps the
    /// entry as provenance with no type facts.
    pub fn project(&self, column: &str) -> ResultColumn {
        match self.column(column) {
            Some(info) => info.project(self.visible_name(), self.force_nullable),
            None => ResultColumn {
                name: column.to_string(),
                alias_table: Some(self.visible_name().to_string()),
                source: Some(ColumnSource { column: Some(column.to_string()), ..self.owner_source() }),
                is_nullable: if self.force_nullable { Some(true) } else { None },
                ..Default::default()
            },
        }
    }

    /// Every known column in stored order, `None` when the columns are unknown.
    pub fn project_all(&self) -> Option<Vec<ResultColumn>> {
        self.columns
            .as_ref()
            .map(|columns| columns.values().map(|info| info.project(self.visible_name(), self.force_nullable)).collect())
    }
}
