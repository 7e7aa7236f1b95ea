pub mod object_reference;
pub use object_reference::*;

pub mod result_column;
pub use result_column::*;

pub mod json_field_node;
pub use json_field_node::*;

pub mod result_set;
pub use result_set::*;

pub mod routine_model;
pub use routine_model::*;
