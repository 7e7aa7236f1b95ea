pub mod analyzer_error;
pub use analyzer_error::*;

pub mod analysis_context;
pub use analysis_context::*;

pub mod scope;
pub use scope::*;

pub mod resolvers;
pub use resolvers::*;

pub mod json;
pub use json::*;

pub mod model_builder;
pub use model_builder::*;
