pub mod ast;

pub mod catalog;
pub use catalog::{CatalogHandle, MetadataProvider, MetadataSnapshot, TypeCatalog};

pub mod config;
pub use config::AnalyzerConfig;

pub mod model;
pub use model::*;

pub mod rules;

pub mod analyzer;
pub use analyzer::{AnalyzerError, ProcedureSemanticModelBuilder};

pub mod dependencies;
pub use dependencies::DependencyCollector;

pub mod routine_analyzer;
pub use routine_analyzer::*;
