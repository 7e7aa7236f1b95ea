pub mod column_source_info;
pub use column_source_info::*;

pub mod alias_scope_entry;
pub use alias_scope_entry::*;

pub mod scope_stack;
pub use scope_stack::*;

pub mod routine_bindings;
pub use routine_bindings::*;

pub mod scope_resolver;
pub use scope_resolver::*;
