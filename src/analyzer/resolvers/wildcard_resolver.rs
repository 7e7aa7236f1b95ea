use crate::{analyzer::AnalysisContext, model::ResultColumn};

pub struct WildcardResolver;

impl WildcardResolver {
    /// Expands `*` or `alias.*` in stored column order. When nothing can be expanded the
    /// star stays as one placeholder column.
    pub fn expand(ctx: &mut AnalysisContext, qualifier: Option<&str>) -> Vec<ResultColumn> {
        let catalog = ctx.catalog;
        match ctx.scopes.expand_wildcard(qualifier, catalog) {
            Some(columns) => columns,
            None => {
                tracing::debug!(qualifier = ?qualifier, "wildcard left unexpanded");
                vec![ResultColumn { alias_table: qualifier.map(str::to_string), ..Default::default() }]
            }
        }
    }
}
