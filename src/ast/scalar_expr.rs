use std::fmt;

use crate::ast::{DataTypeRef, Literal, ObjectName, Query};

/// A possibly qualified column reference: `name`, `alias.name` or `schema.table.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub schema: Option<String>,
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn bare(name: impl Into<String>) -> Self {
        Self { schema: None, qualifier: None, name: name.into() }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self { schema: None, qualifier: Some(qualifier.into()), name: name.into() }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{}.", qualifier)?;
        }
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Cast,
    Convert,
    TryCast,
    TryConvert,
}

impl CastKind {
    pub fn is_try(&self) -> bool {
        matches!(self, CastKind::TryCast | CastKind::TryConvert)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionCall {
    pub name: ObjectName,
    pub args: Vec<ScalarExpr>,
    pub distinct: bool,
    /// Called with an `OVER (...)` window.
    pub windowed: bool,
}

impl FunctionCall {
    pub fn new(name: impl Into<ObjectName>, args: Vec<ScalarExpr>) -> Self {
        Self { name: name.into(), args, distinct: false, windowed: false }
    }

    pub fn over(mut self) -> Self {
        self.windowed = true;
        self
    }

    /// Built-ins are called without a schema; `dbo.fn()` is always user-defined.
    pub fn lowercase_name(&self) -> String {
        self.name.name.to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Like,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
                | BinaryOperator::BitAnd
                | BinaryOperator::BitOr
                | BinaryOperator::BitXor
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    BitNot,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhenClause {
    pub condition: ScalarExpr,
    pub result: ScalarExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarExpr {
    Column(ColumnRef),
    Literal(Literal),
    /// `@name` or a global like `@@ROWCOUNT`.
    Variable(String),
    /// The `*` in `COUNT(*)`.
    Wildcard,
    Cast { kind: CastKind, expr: Box<ScalarExpr>, target: DataTypeRef },
    Function(FunctionCall),
    Iif { condition: Box<ScalarExpr>, then: Box<ScalarExpr>, otherwise: Box<ScalarExpr> },
    Case { operand: Option<Box<ScalarExpr>>, whens: Vec<WhenClause>, else_result: Option<Box<ScalarExpr>> },
    Binary { left: Box<ScalarExpr>, op: BinaryOperator, right: Box<ScalarExpr> },
    Unary { op: UnaryOperator, expr: Box<ScalarExpr> },
    Coalesce(Vec<ScalarExpr>),
    NullIf(Box<ScalarExpr>, Box<ScalarExpr>),
    Subquery(Box<Query>),
    Exists(Box<Query>),
    IsNull { expr: Box<ScalarExpr>, negated: bool },
    InList { expr: Box<ScalarExpr>, list: Vec<ScalarExpr>, negated: bool },
    Nested(Box<ScalarExpr>),
    /// A construct the upstream parser produced but this model does not describe.
    Other(String),
}

impl ScalarExpr {
    pub fn column(name: impl Into<String>) -> Self {
        ScalarExpr::Column(ColumnRef::bare(name))
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        ScalarExpr::Column(ColumnRef::qualified(qualifier, name))
    }

    pub fn int(value: i64) -> Self {
        ScalarExpr::Literal(Literal::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ScalarExpr::Literal(Literal::string(value))
    }

    pub fn null() -> Self {
        ScalarExpr::Literal(Literal::Null)
    }

    pub fn call(name: impl Into<ObjectName>, args: Vec<ScalarExpr>) -> Self {
        ScalarExpr::Function(FunctionCall::new(name, args))
    }

    pub fn cast(expr: ScalarExpr, target: DataTypeRef) -> Self {
        ScalarExpr::Cast { kind: CastKind::Cast, expr: Box::new(expr), target }
    }

    pub fn binary(left: ScalarExpr, op: BinaryOperator, right: ScalarExpr) -> Self {
        ScalarExpr::Binary { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn subquery(query: Query) -> Self {
        ScalarExpr::Subquery(Box::new(query))
    }

    pub fn iif(condition: ScalarExpr, then: ScalarExpr, otherwise: ScalarExpr) -> Self {
        ScalarExpr::Iif { condition: Box::new(condition), then: Box::new(then), otherwise: Box::new(otherwise) }
    }

    /// Strips redundant parentheses.
    pub fn unnested(&self) -> &ScalarExpr {
        match self {
            ScalarExpr::Nested(inner) => inner.unnested(),
            other => other,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self.unnested() {
            ScalarExpr::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}
