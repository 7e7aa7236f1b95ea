use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver},
    ast::{Literal, ScalarExpr},
    model::ResultColumn,
    rules::TypePrecedence,
};

/// Tunable weights for picking the primary branch of a conditional whose branches disagree.
pub const SCORE_EXPLICIT_CAST: u32 = 4;
pub const SCORE_TYPE_NAME: u32 = 2;
pub const SCORE_FACETS: u32 = 1;

pub struct ConditionalResolver;

impl ConditionalResolver {
    /// `IIF` and `CASE`. Without an ELSE branch (`has_else == false`) the result is nullable.
    pub fn resolve(ctx: &mut AnalysisContext, branches: &[&ScalarExpr], has_else: bool) -> Result<ResultColumn, AnalyzerError> {
        let mut candidates = Vec::with_capacity(branches.len());
        for branch in branches {
            let column = ColumnProvenanceResolver::resolve(ctx, branch)?;
            candidates.push((*branch, column));
        }

        let sql_type = candidates
            .iter()
            .fold(None, |acc, (_, column)| TypePrecedence::merge(acc, column.sql_type.as_ref()));
        let mut is_nullable = if has_else { Some(false) } else { Some(true) };
        for (_, column) in &candidates {
            is_nullable = TypePrecedence::either_nullable(is_nullable, column.is_nullable);
        }

        // NULL branches carry no provenance and never compete for primary
        let evidence: Vec<&(&ScalarExpr, ResultColumn)> = candidates
            .iter()
            .filter(|(expr, _)| expr.as_literal() != Some(&Literal::Null))
            .collect();
        let Some(first) = evidence.first() else {
            return Ok(ResultColumn { sql_type, is_nullable, ..Default::default() });
        };

        let agree = evidence.iter().all(|(_, column)| match (&column.source, &first.1.source) {
            (Some(a), Some(b)) => a.same_origin(b),
            _ => false,
        });
        let primary = if agree {
            &first.1
        } else {
            let mut best = *first;
            for candidate in evidence.iter().skip(1) {
                if Self::score(candidate.0, &candidate.1) > Self::score(best.0, &best.1) {
                    best = *candidate;
                }
            }
            tracing::debug!(branches = evidence.len(), "conditional branches disagree; picked primary by score");
            &best.1
        };

        let user_type = if primary.sql_type == sql_type { primary.user_type.clone() } else { None };
        Ok(ResultColumn {
            name: primary.name.clone(),
            source: primary.source.clone(),
            alias_table: primary.alias_table.clone(),
            reference: primary.reference.clone(),
            json: primary.json.clone(),
            children: primary.children.clone(),
            sql_type,
            user_type,
            is_nullable,
            ..Default::default()
        })
    }

    /// Specificity of a branch: explicit cast, then a known type name, then facet hints.
    pub fn score(expr: &ScalarExpr, column: &ResultColumn) -> u32 {
        let mut score = 0;
        if matches!(expr.unnested(), ScalarExpr::Cast { .. }) {
            score += SCORE_EXPLICIT_CAST;
        }
        if let Some(sql_type) = &column.sql_type {
            score += SCORE_TYPE_NAME;
            if sql_type.max_length.is_some() || sql_type.precision.is_some() || sql_type.scale.is_some() {
                score += SCORE_FACETS;
            }
        }
        score
    }
}
