use serde::{Deserialize, Serialize};

/// A node of the JSON document a result set serializes to. Containers have children,
/// leaves do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFieldNode {
    pub name: String,
    /// Dot-joined path from the document root.
    pub path: String,
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonFieldNode>,
}

impl JsonFieldNode {
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { name: name.into(), path: path.into(), is_array: false, children: Vec::new() }
    }

    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&JsonFieldNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}
