pub mod object_name;
pub use object_name::*;

pub mod literal;
pub use literal::*;

pub mod data_type;
pub use data_type::*;

pub mod scalar_expr;
pub use scalar_expr::*;

pub mod for_clause;
pub use for_clause::*;

pub mod query;
pub use query::*;

pub mod table_source;
pub use table_source::*;

pub mod statement;
pub use statement::*;

pub mod routine;
pub use routine::*;
