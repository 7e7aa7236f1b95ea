use serde::{Deserialize, Serialize};

use crate::{ast::ObjectName, catalog::SqlType};

fn default_nullable() -> bool {
    true
}

/// One column of a table, view, table-valued function or table type, as stored in metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub type_name: String,
    /// Set when `type_name` is a user-defined type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            type_schema: None,
            max_length: None,
            precision: None,
            scale: None,
            is_nullable,
        }
    }

    pub fn with_length(mut self, max_length: i32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn user_type(mut self, schema: impl Into<String>) -> Self {
        self.type_schema = Some(schema.into());
        self
    }

    pub fn type_name(&self) -> ObjectName {
        match &self.type_schema {
            Some(schema) => ObjectName::qualified(schema.clone(), self.type_name.clone()),
            None => ObjectName::bare(self.type_name.clone()),
        }
    }
}

/// Resolved type facts for a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub sql_type: SqlType,
    /// The user-defined type the base type was reached through.
    pub user_type: Option<ObjectName>,
    pub is_nullable: Option<bool>,
}

impl TypeDescriptor {
    pub fn of(sql_type: SqlType) -> Self {
        Self { sql_type, user_type: None, is_nullable: None }
    }
}

/// A user-defined scalar type (`CREATE TYPE dbo.Email FROM nvarchar(320) NOT NULL`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTypeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub schema: String,
    pub name: String,
    pub base_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
}

impl ScalarTypeRecord {
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            sql_type: SqlType::builtin(&self.base_type, self.max_length, self.precision, self.scale),
            user_type: Some(ObjectName {
                catalog: self.catalog.clone(),
                schema: Some(self.schema.clone()),
                name: self.name.clone(),
            }),
            is_nullable: self.is_nullable,
        }
    }
}

/// A table or view with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub is_view: bool,
    pub columns: Vec<ColumnRecord>,
}

/// A table-valued function or table type with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSetRecord {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_record_defaults_to_nullable() {
        let record: ColumnRecord = serde_json::from_value(json!({"name": "Note", "type_name": "nvarchar", "max_length": 200}))
            .unwrap();
        assert!(record.is_nullable);
        assert_eq!(record.max_length, Some(200));
        assert_eq!(record.type_name(), ObjectName::bare("nvarchar"));
    }

    #[test]
    fn test_scalar_type_descriptor_keeps_user_type() {
        let record = ScalarTypeRecord {
            catalog: None,
            schema: "dbo".into(),
            name: "Email".into(),
            base_type: "nvarchar".into(),
            max_length: Some(320),
            precision: None,
            scale: None,
            is_nullable: Some(false),
        };
        let descriptor = record.descriptor();
        assert_eq!(descriptor.sql_type, SqlType::nvarchar(320));
        assert_eq!(descriptor.user_type, Some(ObjectName::qualified("dbo", "Email")));
        assert_eq!(descriptor.is_nullable, Some(false));
    }
}
