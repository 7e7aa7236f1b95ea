use std::fmt;

use serde::{Deserialize, Serialize};

/// A one to three part SQL object name (`catalog.schema.name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn bare(name: impl Into<String>) -> Self {
        Self { catalog: None, schema: None, name: name.into() }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self { catalog: None, schema: Some(schema.into()), name: name.into() }
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Table variables (`@t`) and temporary tables (`#t`) are not schema objects.
    pub fn is_local_table(&self) -> bool {
        self.schema.is_none() && (self.name.starts_with('@') || self.name.starts_with('#'))
    }

    /// Lowercased `schema.name` key, `schema` defaulting to `default_schema`.
    pub fn schema_key(&self, default_schema: &str) -> String {
        let schema = self.schema.as_deref().unwrap_or(default_schema);
        format!("{}.{}", schema, self.name).to_ascii_lowercase()
    }

    /// Lowercased `catalog.schema.name` key, only when a catalog is present.
    pub fn catalog_key(&self, default_schema: &str) -> Option<String> {
        self.catalog.as_ref().map(|catalog| format!("{}.{}", catalog, self.schema_key(default_schema)).to_ascii_lowercase())
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{}.", catalog)?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.name)
    }
}

impl From<&str> for ObjectName {
    fn from(value: &str) -> Self {
        let parts: Vec<&str> = value.split('.').collect();
        match parts.as_slice() {
            [name] => ObjectName::bare(*name),
            [schema, name] => ObjectName::qualified(*schema, *name),
            [catalog, schema, name] => ObjectName::qualified(*schema, *name).with_catalog(*catalog),
            _ => ObjectName::bare(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dotted_text() {
        let name = ObjectName::from("Sales.dbo.Orders");
        assert_eq!(name.catalog.as_deref(), Some("Sales"));
        assert_eq!(name.schema.as_deref(), Some("dbo"));
        assert_eq!(name.name, "Orders");
        assert_eq!(name.to_string(), "Sales.dbo.Orders");
    }

    #[test]
    fn test_keys_are_lowercase_and_defaulted() {
        let name = ObjectName::bare("Orders");
        assert_eq!(name.schema_key("dbo"), "dbo.orders");
        assert_eq!(name.catalog_key("dbo"), None);

        let name = ObjectName::qualified("Sales", "Orders").with_catalog("Shop");
        assert_eq!(name.catalog_key("dbo").as_deref(), Some("shop.sales.orders"));
    }

    #[test]
    fn test_local_tables() {
        assert!(ObjectName::bare("@items").is_local_table());
        assert!(ObjectName::bare("#staging").is_local_table());
        assert!(!ObjectName::bare("Orders").is_local_table());
    }
}
