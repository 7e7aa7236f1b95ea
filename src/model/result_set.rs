use serde::{Deserialize, Serialize};

use crate::model::{JsonFieldNode, ObjectReference, ResultColumn};

/// One result set of a routine, in projection order with unique column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<ResultColumn>,
    #[serde(default)]
    pub returns_json: bool,
    #[serde(default)]
    pub returns_json_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_root_name: Option<String>,
    #[serde(default)]
    pub json_include_nulls: bool,
    /// `None` when single-row output cannot be proven either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_single_row_guaranteed: Option<bool>,
    #[serde(default)]
    pub has_wildcard_projection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_shape: Vec<JsonFieldNode>,
    /// Object the rows are read from when the set mirrors one object, e.g. a MERGE target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ObjectReference>,
}

impl ResultSet {
    pub fn column(&self, name: &str) -> Option<&ResultColumn> {
        self.columns.iter().find(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }
}
