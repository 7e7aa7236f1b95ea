use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::MAX_LENGTH;

const BUILTIN_TYPES: &[&str] = &[
    "bigint", "binary", "bit", "char", "date", "datetime", "datetime2", "datetimeoffset", "decimal",
    "float", "geography", "geometry", "hierarchyid", "image", "int", "money", "nchar", "ntext",
    "numeric", "nvarchar", "real", "rowversion", "smalldatetime", "smallint", "smallmoney",
    "sql_variant", "sysname", "text", "time", "timestamp", "tinyint", "uniqueidentifier",
    "varbinary", "varchar", "xml",
];

/// A concrete SQL Server type: base name plus length/precision/scale facets.
///
/// `max_length` counts characters for `nchar`/`nvarchar` and bytes otherwise; a negative
/// value means `(max)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlType {
    pub base_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
}

impl SqlType {
    pub fn new(base_type: &str) -> Self {
        Self { base_type: Self::normalize_base_name(base_type), max_length: None, precision: None, scale: None }
    }

    /// Keeps the name verbatim; used when a type reference cannot be resolved.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self { base_type: name.into(), max_length: None, precision: None, scale: None }
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

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn int() -> Self { Self::new("int") }
    pub fn bigint() -> Self { Self::new("bigint") }
    pub fn bit() -> Self { Self::new("bit") }
    pub fn float() -> Self { Self::new("float") }
    pub fn money() -> Self { Self::new("money") }
    pub fn uniqueidentifier() -> Self { Self::new("uniqueidentifier") }
    pub fn decimal(precision: u8, scale: u8) -> Self { Self::new("decimal").with_precision(precision, scale) }
    pub fn varchar(length: i32) -> Self { Self::new("varchar").with_length(length) }
    pub fn nvarchar(length: i32) -> Self { Self::new("nvarchar").with_length(length) }
    pub fn nvarchar_max() -> Self { Self::new("nvarchar").with_length(MAX_LENGTH) }

    /// Lowercases, strips brackets and folds ANSI synonyms onto SQL Server names.
    pub fn normalize_base_name(name: &str) -> String {
        let trimmed = name.trim().trim_start_matches('[').trim_end_matches(']');
        let lower = trimmed.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();
        let folded = match lower.as_str() {
            "integer" => "int",
            "dec" => "decimal",
            "double precision" => "float",
            "character" => "char",
            "char varying" | "character varying" => "varchar",
            "national char" | "national character" => "nchar",
            "national char varying" | "national character varying" | "nchar varying" => "nvarchar",
            "binary varying" => "varbinary",
            other => other,
        };
        folded.to_string()
    }

    pub fn is_builtin(name: &str) -> bool {
        let normalized = Self::normalize_base_name(name);
        BUILTIN_TYPES.contains(&normalized.as_str())
    }

    /// Built-in type with facets; `sysname` expands to `nvarchar(128)`.
    pub fn builtin(name: &str, max_length: Option<i32>, precision: Option<u8>, scale: Option<u8>) -> Self {
        let base = Self::normalize_base_name(name);
        if base == "sysname" {
            return Self::nvarchar(128);
        }
        Self { base_type: base, max_length, precision, scale }
    }

    pub fn is_length_bearing(&self) -> bool {
        matches!(self.base_type.as_str(), "char" | "varchar" | "nchar" | "nvarchar" | "binary" | "varbinary")
    }

    pub fn is_max(&self) -> bool {
        self.max_length.is_some_and(|length| length < 0)
    }

    pub fn is_exact_decimal(&self) -> bool {
        matches!(self.base_type.as_str(), "decimal" | "numeric")
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.base_type.as_str(), "tinyint" | "smallint" | "int" | "bigint")
    }

    pub fn is_money(&self) -> bool {
        matches!(self.base_type.as_str(), "money" | "smallmoney")
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self.base_type.as_str(), "float" | "real")
    }

    pub fn is_text(&self) -> bool {
        matches!(self.base_type.as_str(), "char" | "varchar" | "nchar" | "nvarchar" | "text" | "ntext")
    }

    fn has_time_scale(&self) -> bool {
        matches!(self.base_type.as_str(), "time" | "datetime2" | "datetimeoffset")
    }

    /// SQL text of the type, e.g. `nvarchar(50)`, `varbinary(max)`, `decimal(10,2)`.
    pub fn render(&self) -> String {
        let base = &self.base_type;
        if self.is_length_bearing() {
            return match self.max_length {
                Some(length) if length < 0 => format!("{}(max)", base),
                Some(length) => format!("{}({})", base, length),
                None => base.clone(),
            };
        }
        if self.is_exact_decimal() {
            return match self.precision {
                Some(precision) => format!("{}({},{})", base, precision, self.scale.unwrap_or(0)),
                None => base.clone(),
            };
        }
        if self.has_time_scale() {
            if let Some(scale) = self.scale {
                return format!("{}({})", base, scale);
            }
        }
        base.clone()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
