use crate::ast::{Cte, DataTypeRef, ObjectName, Query, ScalarExpr, SelectItem, TableSource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableDeclaration {
    pub name: String,
    pub data_type: DataTypeRef,
    pub default: Option<ScalarExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataTypeRef,
    pub nullable: Option<bool>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataTypeRef, nullable: Option<bool>) -> Self {
        Self { name: name.into(), data_type, nullable }
    }
}

/// `OUTPUT ...` on a DML statement. `into` is set for `OUTPUT ... INTO target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputClause {
    pub items: Vec<SelectItem>,
    pub into: Option<ObjectName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecuteStatement {
    pub procedure: ObjectName,
    pub args: Vec<ScalarExpr>,
    pub return_variable: Option<String>,
}

impl ExecuteStatement {
    pub fn new(procedure: impl Into<ObjectName>) -> Self {
        Self { procedure: procedure.into(), args: Vec::new(), return_variable: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InsertSource {
    Values(Vec<Vec<ScalarExpr>>),
    Query(Box<Query>),
    Execute(ExecuteStatement),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsertStatement {
    pub ctes: Vec<Cte>,
    pub target: TableSource,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub output: Option<OutputClause>,
}

/// `UPDATE` or `DELETE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DmlStatement {
    pub ctes: Vec<Cte>,
    pub target: TableSource,
    pub from: Vec<TableSource>,
    pub output: Option<OutputClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeStatement {
    pub ctes: Vec<Cte>,
    /// `TableSource::Named` or `TableSource::Variable`, carrying the target alias.
    pub target: TableSource,
    pub source: TableSource,
    pub on: Option<ScalarExpr>,
    pub output: Option<OutputClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Select(Query),
    Insert(InsertStatement),
    Update(DmlStatement),
    Delete(DmlStatement),
    Merge(MergeStatement),
    Execute(ExecuteStatement),
    Declare(Vec<VariableDeclaration>),
    /// `DECLARE @t TABLE (...)` or `CREATE TABLE #t (...)`.
    DeclareTable { name: String, columns: Vec<ColumnDefinition> },
    SetVariable { name: String, expr: ScalarExpr },
    Block(Vec<Statement>),
    If { condition: ScalarExpr, then: Box<Statement>, otherwise: Option<Box<Statement>> },
    While { condition: ScalarExpr, body: Box<Statement> },
    TryCatch { try_block: Vec<Statement>, catch_block: Vec<Statement> },
    Return(Option<ScalarExpr>),
    Other(String),
}
