pub mod dependency_collector;
pub use dependency_collector::*;
