use std::fmt;

/// Failures that abort the analysis of one routine. Ambiguity, metadata misses and
/// malformed JSON options are not errors and never show up here.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    NestingTooDeep { depth: usize },
    Internal(String),
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::NestingTooDeep { depth } => write!(f, "query nesting exceeds {} levels", depth),
            AnalyzerError::Internal(message) => write!(f, "internal analyzer error: {}", message),
        }
    }
}

impl std::error::Error for AnalyzerError {}
