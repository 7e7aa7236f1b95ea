use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver},
    ast::ScalarExpr,
    model::ResultColumn,
    rules::TypePrecedence,
};

pub struct NullHandlingResolver;

impl NullHandlingResolver {
    fn resolve_all(ctx: &mut AnalysisContext, args: &[ScalarExpr]) -> Result<Vec<ResultColumn>, AnalyzerError> {
        args.iter().map(|arg| ColumnProvenanceResolver::resolve(ctx, arg)).collect()
    }

    /// Provenance from the first argument, type merged across all of them.
    fn merged(columns: &[ResultColumn]) -> ResultColumn {
        let sql_type = columns
            .iter()
            .fold(None, |acc, column| TypePrecedence::merge(acc, column.sql_type.as_ref()));
        let mut merged = columns.first().cloned().unwrap_or_default();
        if merged.sql_type != sql_type {
            merged.user_type = None;
        }
        merged.sql_type = sql_type;
        merged.aggregate = None;
        merged
    }

    /// Not nullable as soon as one argument is known not to be; nullable only when all are.
    pub fn coalesce(ctx: &mut AnalysisContext, args: &[ScalarExpr]) -> Result<ResultColumn, AnalyzerError> {
        let columns = Self::resolve_all(ctx, args)?;
        let mut result = Self::merged(&columns);
        result.is_nullable = if columns.iter().any(|column| column.is_nullable == Some(false)) {
            Some(false)
        } else if !columns.is_empty() && columns.iter().all(|column| column.is_nullable == Some(true)) {
            Some(true)
        } else {
            None
        };
        Ok(result)
    }

    /// `ISNULL(check, replacement)` is nullable only when the replacement is known to be
    /// nullable and the checked value is not known to be non-null.
    pub fn isnull(ctx: &mut AnalysisContext, args: &[ScalarExpr]) -> Result<ResultColumn, AnalyzerError> {
        let columns = Self::resolve_all(ctx, args)?;
        let mut result = Self::merged(&columns);
        let check = columns.first().and_then(|column| column.is_nullable);
        let replacement = columns.get(1).and_then(|column| column.is_nullable);
        result.is_nullable = Some(replacement.unwrap_or(false) && check != Some(false));
        Ok(result)
    }

    pub fn nullif(ctx: &mut AnalysisContext, left: &ScalarExpr, right: &ScalarExpr) -> Result<ResultColumn, AnalyzerError> {
        let mut result = ColumnProvenanceResolver::resolve(ctx, left)?;
        ColumnProvenanceResolver::resolve(ctx, right)?;
        result.is_nullable = Some(true);
        result.aggregate = None;
        Ok(result)
    }
}
