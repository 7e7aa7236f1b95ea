use serde::{Deserialize, Serialize};

use crate::{
    ast::ObjectName,
    catalog::SqlType,
    model::{ObjectKind, ObjectReference},
};

/// Where a projected value comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Table or view, when the source is a catalog object rather than a local table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_kind: Option<ObjectKind>,
}

impl ColumnSource {
    pub fn same_origin(&self, other: &ColumnSource) -> bool {
        let eq = |a: &Option<String>, b: &Option<String>| match (a, b) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        eq(&self.schema, &other.schema) && eq(&self.table, &other.table) && eq(&self.column, &other.column)
    }
}

/// JSON facts of a column whose value is itself a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonColumnInfo {
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,
    #[serde(default)]
    pub include_nulls: bool,
    /// Produced by a nested FOR JSON subquery.
    #[serde(default)]
    pub is_nested: bool,
    /// JSON whose inner structure could not be determined.
    #[serde(default)]
    pub shape_unknown: bool,
}

/// One projected column of a result set. Children describe JSON containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    /// Explicit `AS alias` as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Table alias the value was read through, e.g. `o` in `o.Id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ColumnSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<SqlType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<ObjectName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    #[serde(default)]
    pub is_ambiguous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ObjectReference>,
    /// Lowercase name of the aggregate at the top of the expression. Unset for `OVER (...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonColumnInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultColumn>,
}

impl ResultColumn {
    pub fn typed(sql_type: SqlType, is_nullable: bool) -> Self {
        Self { sql_type: Some(sql_type), is_nullable: Some(is_nullable), ..Default::default() }
    }

    pub fn source_column(&self) -> Option<&str> {
        self.source.as_ref().and_then(|source| source.column.as_deref())
    }

    pub fn source_table(&self) -> Option<&str> {
        self.source.as_ref().and_then(|source| source.table.as_deref())
    }

    pub fn returns_json(&self) -> bool {
        self.json.is_some()
    }

    /// Ambiguous columns keep no type facts.
    pub fn mark_ambiguous(&mut self) {
        self.is_ambiguous = true;
        self.source = None;
        self.sql_type = None;
        self.user_type = None;
        self.is_nullable = None;
    }

    /// A column that carries nothing but its name.
    pub fn is_unresolved(&self) -> bool {
        self.source.is_none()
            && self.sql_type.is_none()
            && self.reference.is_none()
            && self.json.is_none()
            && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_is_case_insensitive() {
        let a = ColumnSource { schema: Some("dbo".into()), table: Some("Orders".into()), column: Some("Id".into()), object_kind: None };
        let b = ColumnSource { schema: Some("DBO".into()), table: Some("orders".into()), column: Some("ID".into()), object_kind: Some(ObjectKind::Table) };
        assert!(a.same_origin(&b));
        let c = ColumnSource { column: Some("Total".into()), ..a.clone() };
        assert!(!a.same_origin(&c));
    }

    #[test]
    fn test_mark_ambiguous_clears_type_facts() {
        let mut column = ResultColumn::typed(SqlType::int(), false);
        column.name = "Id".into();
        column.mark_ambiguous();
        assert!(column.is_ambiguous);
        assert!(column.sql_type.is_none());
        assert!(column.is_nullable.is_none());
        assert!(column.is_unresolved());
    }
}
