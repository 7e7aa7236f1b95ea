use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver},
    ast::{BinaryOperator, ScalarExpr},
    catalog::SqlType,
    model::ResultColumn,
    rules::TypePrecedence,
};

pub struct BinaryResolver;

impl BinaryResolver {
    /// Arithmetic and concatenation take the higher-precedence operand type; comparisons and
    /// logical operators yield `bit`. Nullable when either operand is.
    pub fn resolve(ctx: &mut AnalysisContext, left: &ScalarExpr, op: BinaryOperator, right: &ScalarExpr) -> Result<ResultColumn, AnalyzerError> {
        let left = ColumnProvenanceResolver::resolve(ctx, left)?;
        let right = ColumnProvenanceResolver::resolve(ctx, right)?;
        let is_nullable = TypePrecedence::either_nullable(left.is_nullable, right.is_nullable);

        if !op.is_arithmetic() {
            return Ok(ResultColumn { sql_type: Some(SqlType::bit()), is_nullable, ..Default::default() });
        }
        let (sql_type, user_type) = match (&left.sql_type, &right.sql_type) {
            (Some(l), Some(r)) if std::ptr::eq(TypePrecedence::dominant(l, r), r) => (Some(r.clone()), right.user_type),
            (Some(l), _) => (Some(l.clone()), left.user_type),
            (None, Some(r)) => (Some(r.clone()), right.user_type),
            (None, None) => (None, None),
        };
        Ok(ResultColumn { sql_type, user_type, is_nullable, ..Default::default() })
    }
}
