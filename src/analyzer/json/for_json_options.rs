use crate::ast::{ForClause, ForJsonMode, ForJsonOption};

/// FOR JSON options of one query. `None` fields were not stated (or could not be read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForJsonOptions {
    pub mode: ForJsonMode,
    pub without_array_wrapper: Option<bool>,
    pub root_name: Option<String>,
    pub include_null_values: Option<bool>,
    /// Option text the parser could not classify.
    pub unparsed: Vec<String>,
}

impl ForJsonOptions {
    pub const DEFAULT_ROOT: &'static str = "root";

    pub fn from_clause(clause: &ForClause) -> Option<Self> {
        let ForClause::Json { mode, options } = clause else {
            return None;
        };
        let mut parsed = Self {
            mode: *mode,
            without_array_wrapper: None,
            root_name: None,
            include_null_values: None,
            unparsed: Vec::new(),
        };
        for option in options {
            match option {
                ForJsonOption::WithoutArrayWrapper => parsed.without_array_wrapper = Some(true),
                ForJsonOption::IncludeNullValues => parsed.include_null_values = Some(true),
                ForJsonOption::Root(name) => {
                    parsed.root_name = Some(name.clone().unwrap_or_else(|| Self::DEFAULT_ROOT.to_string()))
                }
                ForJsonOption::Unparsed(text) => parsed.unparsed.push(text.clone()),
            }
        }
        Some(parsed)
    }

    pub fn returns_array(&self) -> bool {
        !self.without_array_wrapper.unwrap_or(false)
    }

    pub fn include_nulls(&self) -> bool {
        self.include_null_values.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_options_is_array_without_root() {
        let options = ForJsonOptions::from_clause(&ForClause::json_path(vec![])).unwrap();
        assert!(options.returns_array());
        assert!(!options.include_nulls());
        assert_eq!(options.root_name, None);
    }

    #[test]
    fn test_structured_options() {
        let clause = ForClause::json_path(vec![
            ForJsonOption::WithoutArrayWrapper,
            ForJsonOption::Root(None),
            ForJsonOption::IncludeNullValues,
        ]);
        let options = ForJsonOptions::from_clause(&clause).unwrap();
        assert!(!options.returns_array());
        assert!(options.include_nulls());
        assert_eq!(options.root_name.as_deref(), Some("root"));
    }

    #[test]
    fn test_non_json_clause() {
        assert!(ForJsonOptions::from_clause(&ForClause::Xml("RAW".into())).is_none());
    }
}
