use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver},
    ast::{CastKind, DataTypeRef, ScalarExpr},
    model::ResultColumn,
};

pub struct CastResolver;

impl CastResolver {
    /// Keeps the operand's provenance and takes the type from the cast target.
    /// `TRY_CAST`/`TRY_CONVERT` are always nullable.
    pub fn resolve(ctx: &mut AnalysisContext, kind: CastKind, expr: &ScalarExpr, target: &DataTypeRef) -> Result<ResultColumn, AnalyzerError> {
        let mut column = ColumnProvenanceResolver::resolve(ctx, expr)?;
        let descriptor = ctx.catalog.resolve_data_type(target);
        column.sql_type = Some(descriptor.sql_type);
        column.user_type = descriptor.user_type;
        column.aggregate = None;
        if kind.is_try() {
            column.is_nullable = Some(true);
        }
        Ok(column)
    }
}
