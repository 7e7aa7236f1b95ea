#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForJsonMode {
    Auto,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForJsonOption {
    /// `ROOT` or `ROOT('name')`.
    Root(Option<String>),
    IncludeNullValues,
    WithoutArrayWrapper,
    /// Option text the parser could not classify.
    Unparsed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForClause {
    Json { mode: ForJsonMode, options: Vec<ForJsonOption> },
    Xml(String),
    Browse,
}

impl ForClause {
    pub fn json_path(options: Vec<ForJsonOption>) -> Self {
        ForClause::Json { mode: ForJsonMode::Path, options }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ForClause::Json { .. })
    }
}
