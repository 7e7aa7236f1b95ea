use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::ObjectName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    View,
    Function,
    Procedure,
    TableType,
    UserDefinedType,
}

/// An external object a column, result set or routine depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    pub kind: ObjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl ObjectReference {
    pub fn new(kind: ObjectKind, name: &ObjectName) -> Self {
        Self { kind, catalog: name.catalog.clone(), schema: name.schema.clone(), name: name.name.clone() }
    }

    /// Case-insensitive identity used for deduplication.
    pub fn identity(&self) -> (ObjectKind, String, String, String) {
        (
            self.kind,
            self.catalog.as_deref().unwrap_or_default().to_ascii_lowercase(),
            self.schema.as_deref().unwrap_or_default().to_ascii_lowercase(),
            self.name.to_ascii_lowercase(),
        )
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ObjectName { catalog: self.catalog.clone(), schema: self.schema.clone(), name: self.name.clone() };
        write!(f, "{:?} {}", self.kind, name)
    }
}

/// A procedure invoked with `EXEC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutedRoutineReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub schema: String,
    pub name: String,
}

impl ExecutedRoutineReference {
    pub fn as_reference(&self) -> ObjectReference {
        ObjectReference {
            kind: ObjectKind::Procedure,
            catalog: self.catalog.clone(),
            schema: Some(self.schema.clone()),
            name: self.name.clone(),
        }
    }
}
