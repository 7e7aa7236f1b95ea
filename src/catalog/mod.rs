pub mod sql_type;
pub use sql_type::*;

pub mod column_record;
pub use column_record::*;

pub mod catalog_error;
pub use catalog_error::*;

pub mod metadata_snapshot;
pub use metadata_snapshot::*;

pub mod type_catalog;
pub use type_catalog::*;

pub mod catalog_handle;
pub use catalog_handle::*;

use crate::{ast::ObjectName, model::ObjectKind};

/// Read-only access to database metadata. Every lookup is best-effort: `None` means the
/// object is unknown, never that the lookup failed loudly.
pub trait MetadataProvider: Send + Sync {
    fn lookup_table_columns(&self, schema: &str, name: &str, catalog: Option<&str>) -> Option<Vec<ColumnRecord>>;

    fn lookup_function_columns(&self, schema: &str, name: &str) -> Option<Vec<ColumnRecord>>;

    fn lookup_table_type_columns(&self, schema: &str, name: &str) -> Option<Vec<ColumnRecord>>;

    fn lookup_scalar_type(&self, type_ref: &ObjectName) -> Option<TypeDescriptor>;

    /// Distinguishes views from tables when the store knows.
    fn lookup_object_kind(&self, _schema: &str, _name: &str, _catalog: Option<&str>) -> Option<ObjectKind> {
        None
    }
}
