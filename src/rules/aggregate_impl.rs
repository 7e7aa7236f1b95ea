use crate::catalog::SqlType;

/// Kind of literal found inside an aggregate argument whose type is otherwise unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralHint {
    Integer,
    Decimal,
}

/// What is known about the argument of an aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOperand {
    pub sql_type: Option<SqlType>,
    pub is_nullable: Option<bool>,
    pub literal: Option<LiteralHint>,
}

impl AggregateOperand {
    pub fn of(sql_type: SqlType, is_nullable: bool) -> Self {
        Self { sql_type: Some(sql_type), is_nullable: Some(is_nullable), literal: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTyping {
    pub sql_type: Option<SqlType>,
    pub is_nullable: Option<bool>,
}

impl AggregateTyping {
    pub fn nullable(sql_type: SqlType) -> Self {
        Self { sql_type: Some(sql_type), is_nullable: Some(true) }
    }
}

/// Result-type rule of one aggregate function.
/// One stateless instance is registered per function name.
pub trait AggregateImpl: Send + Sync {
    /// Canonical lowercase function name ("count", "sum", ...).
    fn name(&self) -> &'static str;

    fn infer_type(&self, operand: &AggregateOperand) -> AggregateTyping;
}
