use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnNaming, ColumnProvenanceResolver, JsonShapeExtractor, ScopeResolver, WildcardResolver},
    ast::{Query, QueryBody, Select, SelectItem},
    model::{ResultColumn, ResultSet},
    rules::TypePrecedence,
};

#[derive(Debug, Default)]
struct Projection {
    columns: Vec<ResultColumn>,
    has_wildcard: bool,
}

/// Turns a query (top-level, nested, CTE or derived) into a named result set.
pub struct QueryResolver;

impl QueryResolver {
    pub fn resolve(ctx: &mut AnalysisContext, query: &Query) -> Result<ResultSet, AnalyzerError> {
        ctx.enter()?;
        ctx.push_ctes(&query.ctes);
        let outcome = Self::resolve_body(ctx, &query.body);
        ctx.pop_ctes();
        ctx.leave();

        let projection = outcome?;
        let mut result_set = ResultSet {
            columns: projection.columns,
            has_wildcard_projection: projection.has_wildcard,
            ..Default::default()
        };
        ColumnNaming::assign(&mut result_set.columns);
        JsonShapeExtractor::apply(ctx, query, &mut result_set);
        Ok(result_set)
    }

    /// Named columns of the leftmost branch of a set operation.
    pub fn resolve_anchor(ctx: &mut AnalysisContext, query: &Query) -> Result<Vec<ResultColumn>, AnalyzerError> {
        let mut body = &query.body;
        while let QueryBody::SetOperation { left, .. } = body {
            body = &**left;
        }
        ctx.enter()?;
        let outcome = Self::resolve_body(ctx, body);
        ctx.leave();

        let mut columns = outcome?.columns;
        ColumnNaming::assign(&mut columns);
        Ok(columns)
    }

    fn resolve_body(ctx: &mut AnalysisContext, body: &QueryBody) -> Result<Projection, AnalyzerError> {
        match body {
            QueryBody::Select(select) => {
                ctx.scopes.push();
                let outcome = Self::resolve_select(ctx, select);
                ctx.scopes.pop();
                outcome
            }
            QueryBody::Nested(query) => {
                let result_set = Self::resolve(ctx, query)?;
                Ok(Projection { columns: result_set.columns, has_wildcard: result_set.has_wildcard_projection })
            }
            // columns come from the first branch; a nullable column in any branch widens it
            QueryBody::SetOperation { left, right, .. } => {
                let mut first = Self::resolve_body(ctx, left)?;
                let other = Self::resolve_body(ctx, right)?;
                for (column, other) in first.columns.iter_mut().zip(&other.columns) {
                    column.is_nullable = TypePrecedence::either_nullable(column.is_nullable, other.is_nullable);
                }
                first.has_wildcard |= other.has_wildcard;
                Ok(first)
            }
        }
    }

    fn resolve_select(ctx: &mut AnalysisContext, select: &Select) -> Result<Projection, AnalyzerError> {
        for source in &select.from {
            ScopeResolver::register(ctx, source)?;
        }

        let mut projection = Projection::default();
        for item in &select.projection {
            match item {
                SelectItem::Expr { expr, alias } => {
                    let mut column = ColumnProvenanceResolver::resolve(ctx, expr)?;
                    if alias.is_some() {
                        column.alias = alias.clone();
                    }
                    projection.columns.push(column);
                }
                SelectItem::Wildcard { qualifier } => {
                    projection.has_wildcard = true;
                    projection.columns.extend(WildcardResolver::expand(ctx, qualifier.as_deref()));
                }
                SelectItem::Assignment { .. } => {}
            }
        }
        Ok(projection)
    }

    /// Resolves a projection list (an OUTPUT clause) against the scopes already registered.
    pub fn resolve_items(ctx: &mut AnalysisContext, items: &[SelectItem]) -> Result<ResultSet, AnalyzerError> {
        let select = Select::new(items.to_vec());
        let projection = Self::resolve_select(ctx, &select)?;
        let mut result_set = ResultSet {
            columns: projection.columns,
            has_wildcard_projection: projection.has_wildcard,
            ..Default::default()
        };
        ColumnNaming::assign(&mut result_set.columns);
        Ok(result_set)
    }
}
