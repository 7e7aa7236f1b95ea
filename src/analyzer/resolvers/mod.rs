pub mod column_provenance_resolver;
pub use column_provenance_resolver::*;

pub mod column_resolver;
pub use column_resolver::*;

pub mod literal_resolver;
pub use literal_resolver::*;

pub mod cast_resolver;
pub use cast_resolver::*;

pub mod function_resolver;
pub use function_resolver::*;

pub mod conditional_resolver;
pub use conditional_resolver::*;

pub mod binary_resolver;
pub use binary_resolver::*;

pub mod null_handling_resolver;
pub use null_handling_resolver::*;

pub mod subquery_resolver;
pub use subquery_resolver::*;

pub mod wildcard_resolver;
pub use wildcard_resolver::*;

pub mod column_naming;
pub use column_naming::*;

pub mod query_resolver;
pub use query_resolver::*;
