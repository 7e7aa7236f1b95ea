use crate::ast::{ForClause, Literal, ScalarExpr, TableSource};

/// `WITH name (columns) AS (query)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Top {
    pub quantity: ScalarExpr,
    pub percent: bool,
    pub with_ties: bool,
}

impl Top {
    pub fn rows(count: i64) -> Self {
        Self { quantity: ScalarExpr::int(count), percent: false, with_ties: false }
    }

    /// `TOP (1)` without `PERCENT` or `WITH TIES`.
    pub fn is_single_row(&self) -> bool {
        !self.percent && !self.with_ties && self.quantity.as_literal() == Some(&Literal::Int(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectItem {
    Expr { expr: ScalarExpr, alias: Option<String> },
    /// `*` or `alias.*`.
    Wildcard { qualifier: Option<String> },
    /// `@var = expr`, which produces no client column.
    Assignment { variable: String, expr: ScalarExpr },
}

impl SelectItem {
    pub fn expr(expr: ScalarExpr) -> Self {
        SelectItem::Expr { expr, alias: None }
    }

    pub fn aliased(expr: ScalarExpr, alias: impl Into<String>) -> Self {
        SelectItem::Expr { expr, alias: Some(alias.into()) }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, SelectItem::Assignment { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderByExpr {
    pub expr: ScalarExpr,
    pub descending: bool,
}

/// One `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Select {
    pub distinct: bool,
    pub top: Option<Top>,
    pub projection: Vec<SelectItem>,
    /// `SELECT ... INTO target`.
    pub into: Option<String>,
    pub from: Vec<TableSource>,
    pub selection: Option<ScalarExpr>,
    pub group_by: Vec<ScalarExpr>,
    pub having: Option<ScalarExpr>,
}

impl Select {
    pub fn new(projection: Vec<SelectItem>) -> Self {
        Self { projection, ..Default::default() }
    }

    pub fn from(mut self, source: TableSource) -> Self {
        self.from.push(source);
        self
    }

    pub fn top(mut self, top: Top) -> Self {
        self.top = Some(top);
        self
    }

    pub fn group_by(mut self, exprs: Vec<ScalarExpr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn into_query(self) -> Query {
        Query::new(QueryBody::Select(Box::new(self)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    UnionAll,
    Except,
    Intersect,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryBody {
    Select(Box<Select>),
    SetOperation { op: SetOperator, left: Box<QueryBody>, right: Box<QueryBody> },
    Nested(Box<Query>),
}

impl QueryBody {
    /// The leftmost `SELECT` block, which names the columns of a set operation.
    pub fn first_select(&self) -> Option<&Select> {
        match self {
            QueryBody::Select(select) => Some(select),
            QueryBody::SetOperation { left, .. } => left.first_select(),
            QueryBody::Nested(query) => query.body.first_select(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub ctes: Vec<Cte>,
    pub body: QueryBody,
    pub order_by: Vec<OrderByExpr>,
    pub for_clause: Option<ForClause>,
    /// Source text of the query as handed over by the parser, when available.
    pub source_text: Option<String>,
}

impl Query {
    pub fn new(body: QueryBody) -> Self {
        Self { ctes: Vec::new(), body, order_by: Vec::new(), for_clause: None, source_text: None }
    }

    pub fn with_ctes(mut self, ctes: Vec<Cte>) -> Self {
        self.ctes = ctes;
        self
    }

    pub fn for_clause(mut self, for_clause: ForClause) -> Self {
        self.for_clause = Some(for_clause);
        self
    }

    pub fn source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn first_select(&self) -> Option<&Select> {
        self.body.first_select()
    }

    /// Whether the query sends at least one column to the client.
    pub fn projects_visible_columns(&self) -> bool {
        match self.first_select() {
            Some(select) => select.into.is_none() && select.projection.iter().any(SelectItem::is_visible),
            None => false,
        }
    }
}
