use crate::{
    analyzer::{
        AnalysisContext, AnalyzerError, BinaryResolver, CastResolver, ColumnResolver, ConditionalResolver, FunctionResolver,
        LiteralResolver, NullHandlingResolver, SubqueryResolver,
    },
    ast::{ScalarExpr, UnaryOperator},
    catalog::SqlType,
    model::ResultColumn,
    rules::BuiltinFunctions,
};

/// Resolves one projected expression into an unnamed candidate column: provenance,
/// type, nullability, reference and JSON children.
pub struct ColumnProvenanceResolver;

impl ColumnProvenanceResolver {
    pub fn resolve(ctx: &mut AnalysisContext, expr: &ScalarExpr) -> Result<ResultColumn, AnalyzerError> {
        match expr {
            ScalarExpr::Column(column) => Ok(ColumnResolver::resolve(ctx, column)),
            ScalarExpr::Literal(literal) => Ok(LiteralResolver::resolve(literal)),
            ScalarExpr::Variable(name) => Ok(Self::resolve_variable(ctx, name)),
            ScalarExpr::Wildcard => Ok(ResultColumn::default()),
            ScalarExpr::Cast { kind, expr, target } => CastResolver::resolve(ctx, *kind, expr, target),
            ScalarExpr::Function(call) => FunctionResolver::resolve(ctx, call),
            ScalarExpr::Iif { then, otherwise, .. } => ConditionalResolver::resolve(ctx, &[&**then, &**otherwise], true),
            ScalarExpr::Case { whens, else_result, .. } => {
                let mut branches: Vec<&ScalarExpr> = whens.iter().map(|when| &when.result).collect();
                if let Some(else_result) = else_result {
                    branches.push(else_result);
                }
                ConditionalResolver::resolve(ctx, &branches, else_result.is_some())
            }
            ScalarExpr::Binary { left, op, right } => BinaryResolver::resolve(ctx, left, *op, right),
            ScalarExpr::Unary { op: UnaryOperator::Not, expr } => {
                let operand = Self::resolve(ctx, expr)?;
                Ok(ResultColumn { sql_type: Some(SqlType::bit()), is_nullable: operand.is_nullable, ..Default::default() })
            }
            ScalarExpr::Unary { expr, .. } => {
                let operand = Self::resolve(ctx, expr)?;
                Ok(ResultColumn { sql_type: operand.sql_type, is_nullable: operand.is_nullable, ..Default::default() })
            }
            ScalarExpr::Coalesce(args) => NullHandlingResolver::coalesce(ctx, args),
            ScalarExpr::NullIf(left, right) => NullHandlingResolver::nullif(ctx, left, right),
            ScalarExpr::Subquery(query) => SubqueryResolver::resolve(ctx, query),
            ScalarExpr::Exists(_) | ScalarExpr::IsNull { .. } | ScalarExpr::InList { .. } => {
                Ok(ResultColumn::typed(SqlType::bit(), false))
            }
            ScalarExpr::Nested(inner) => Self::resolve(ctx, inner),
            ScalarExpr::Other(text) => {
                tracing::debug!(expr = %text, "unmodeled expression left unresolved");
                Ok(ResultColumn::default())
            }
        }
    }

    fn resolve_variable(ctx: &AnalysisContext, name: &str) -> ResultColumn {
        if name.starts_with("@@") {
            return match BuiltinFunctions::global_variable(name) {
                Some((sql_type, is_nullable)) => ResultColumn::typed(sql_type, is_nullable),
                None => ResultColumn::default(),
            };
        }
        match ctx.bindings.scalar(name) {
            Some(descriptor) => ResultColumn {
                sql_type: Some(descriptor.sql_type.clone()),
                user_type: descriptor.user_type.clone(),
                is_nullable: Some(descriptor.is_nullable.unwrap_or(true)),
                ..Default::default()
            },
            None => {
                tracing::debug!(variable = name, "undeclared variable");
                ResultColumn::default()
            }
        }
    }
}
