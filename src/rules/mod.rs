pub mod type_precedence;
pub use type_precedence::*;

pub mod aggregate_impl;
pub use aggregate_impl::*;

pub mod aggregate_registry;
pub use aggregate_registry::*;

pub mod builtin_functions;
pub use builtin_functions::*;

pub mod functions;
pub use functions::*;
