use crate::ast::{DataTypeRef, FunctionCall, ObjectName, Query, ScalarExpr};

/// Every join and apply variant the analyzer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
    CrossApply,
    OuterApply,
}

impl JoinKind {
    /// (left side nullable, right side nullable)
    pub fn nullable_sides(&self) -> (bool, bool) {
        match self {
            JoinKind::Inner | JoinKind::Cross | JoinKind::CrossApply => (false, false),
            JoinKind::LeftOuter | JoinKind::OuterApply => (false, true),
            JoinKind::RightOuter => (true, false),
            JoinKind::FullOuter => (true, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Join {
    pub kind: JoinKind,
    pub left: TableSource,
    pub right: TableSource,
    pub on: Option<ScalarExpr>,
}

/// A column of an `OPENJSON(...) WITH (...)` schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpenJsonColumn {
    pub name: String,
    pub data_type: DataTypeRef,
    pub path: Option<String>,
    pub as_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableSource {
    /// Table, view, CTE or temporary table.
    Named { name: ObjectName, alias: Option<String> },
    /// Table variable or table-valued parameter.
    Variable { name: String, alias: Option<String> },
    Derived { query: Box<Query>, alias: String, columns: Vec<String> },
    Function { call: FunctionCall, alias: Option<String> },
    OpenJson { expr: ScalarExpr, path: Option<String>, columns: Vec<OpenJsonColumn>, alias: Option<String> },
    Join(Box<Join>),
}

impl TableSource {
    pub fn named(name: impl Into<ObjectName>, alias: Option<&str>) -> Self {
        TableSource::Named { name: name.into(), alias: alias.map(str::to_string) }
    }

    pub fn join(self, kind: JoinKind, right: TableSource, on: Option<ScalarExpr>) -> Self {
        TableSource::Join(Box::new(Join { kind, left: self, right, on }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_sides() {
        assert_eq!(JoinKind::LeftOuter.nullable_sides(), (false, true));
        assert_eq!(JoinKind::OuterApply.nullable_sides(), (false, true));
        assert_eq!(JoinKind::RightOuter.nullable_sides(), (true, false));
        assert_eq!(JoinKind::FullOuter.nullable_sides(), (true, true));
        assert_eq!(JoinKind::CrossApply.nullable_sides(), (false, false));
    }
}
