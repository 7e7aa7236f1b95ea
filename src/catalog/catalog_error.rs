use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Io { path: String, message: String },
    Json { path: String, message: String },
    /// A single metadata record that could not be decoded. Logged and skipped during loading.
    InvalidRecord { kind: &'static str, index: usize, message: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io { path, message } => write!(f, "CatalogError: cannot read '{}': {}", path, message),
            CatalogError::Json { path, message } => write!(f, "CatalogError: invalid snapshot '{}': {}", path, message),
            CatalogError::InvalidRecord { kind, index, message } => {
                write!(f, "CatalogError: {} record #{} skipped: {}", kind, index, message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}
