use serde::Deserialize;

/// Settings shared by every routine analysis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Schema assumed for unqualified tables, functions, procedures and user-defined types.
    pub default_schema: String,
    /// Schema whose type references are built-in types.
    pub system_schema: String,
    /// Scan query text for FOR JSON options the parser left unclassified.
    pub json_text_fallback: bool,
    pub max_nesting_depth: usize,
    /// Worker threads for batch analysis, `0` meaning available parallelism.
    pub parallelism: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_schema: "dbo".to_string(),
            system_schema: "sys".to_string(),
            json_text_fallback: true,
            max_nesting_depth: 64,
            parallelism: 0,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_schema(mut self, schema: &str) -> Self {
        self.default_schema = schema.to_string();
        self
    }

    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AnalyzerConfig = serde_json::from_value(json!({ "default_schema": "sales" })).unwrap();
        assert_eq!(config.default_schema, "sales");
        assert_eq!(config.system_schema, "sys");
        assert!(config.json_text_fallback);
        assert_eq!(config.max_nesting_depth, 64);
    }
}
