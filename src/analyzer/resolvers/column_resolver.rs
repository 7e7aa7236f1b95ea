use crate::{
    analyzer::{AnalysisContext, ColumnLookup},
    ast::ColumnRef,
    catalog::SqlType,
    model::ResultColumn,
};

pub struct ColumnResolver;

impl ColumnResolver {
    pub fn resolve(ctx: &mut AnalysisContext, column: &ColumnRef) -> ResultColumn {
        if column.qualifier.is_none() && column.name.eq_ignore_ascii_case("$action") {
            let mut action = ResultColumn::typed(SqlType::nvarchar(10), false);
            action.name = column.name.clone();
            return action;
        }

        let catalog = ctx.catalog;
        match ctx.scopes.lookup_column(column, catalog) {
            ColumnLookup::Found(mut resolved) => {
                resolved.name = column.name.clone();
                resolved
            }
            ColumnLookup::Ambiguous => {
                tracing::debug!(column = %column, "ambiguous column reference");
                let mut ambiguous = ResultColumn { name: column.name.clone(), ..Default::default() };
                ambiguous.mark_ambiguous();
                ambiguous
            }
            ColumnLookup::Unresolved => ResultColumn { name: column.name.clone(), ..Default::default() },
        }
    }
}
