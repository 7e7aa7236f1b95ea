use crate::{
    analyzer::{AnalysisContext, AnalyzerError, QueryResolver},
    ast::Query,
    catalog::SqlType,
    model::{JsonColumnInfo, ResultColumn, ResultSet},
};

pub struct SubqueryResolver;

impl SubqueryResolver {
    pub fn resolve(ctx: &mut AnalysisContext, query: &Query) -> Result<ResultColumn, AnalyzerError> {
        let nested = QueryResolver::resolve(ctx, query)?;
        Ok(Self::into_column(nested))
    }

    /// A FOR JSON subquery becomes a nested JSON container; a plain single-column subquery
    /// is flattened into its column; anything else keeps its columns as children.
    pub fn into_column(nested: ResultSet) -> ResultColumn {
        if nested.returns_json {
            return ResultColumn {
                sql_type: Some(SqlType::nvarchar_max()),
                is_nullable: Some(true),
                json: Some(JsonColumnInfo {
                    is_array: nested.returns_json_array,
                    root_name: nested.json_root_name,
                    include_nulls: nested.json_include_nulls,
                    is_nested: true,
                    shape_unknown: false,
                }),
                children: nested.columns,
                ..Default::default()
            };
        }

        let mut columns = nested.columns;
        let flatten = matches!(columns.as_slice(), [single] if single.children.is_empty() && single.json.is_none());
        match columns.pop() {
            Some(mut single) if flatten => {
                single.alias = None;
                single
            }
            Some(last) => {
                columns.push(last);
                ResultColumn { children: columns, ..Default::default() }
            }
            None => ResultColumn::default(),
        }
    }
}
