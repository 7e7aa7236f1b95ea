use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnProvenanceResolver, ForJsonOptions, FunctionResolver, JsonTextFallback, SubqueryResolver},
    ast::{BinaryOperator, ForJsonMode, FunctionCall, Literal, Query, QueryBody, ScalarExpr, SelectItem},
    catalog::SqlType,
    model::{JsonColumnInfo, JsonFieldNode, ObjectKind, ObjectReference, ResultColumn, ResultSet},
    rules::AggregateRegistry,
};

/// Name given to the element of a hand-assembled JSON array when nothing better is known.
pub const ARRAY_ITEM_NAME: &str = "Item";

pub struct JsonShapeExtractor;

impl JsonShapeExtractor {
    /// Sets the JSON flags and field tree of a result set whose query carries FOR JSON.
    pub fn apply(ctx: &AnalysisContext, query: &Query, result_set: &mut ResultSet) {
        let Some(mut options) = query.for_clause.as_ref().and_then(ForJsonOptions::from_clause) else {
            return;
        };
        if ctx.config.json_text_fallback && !options.unparsed.is_empty() {
            JsonTextFallback::fill(&mut options, query.source_text.as_deref());
        }

        result_set.returns_json = true;
        result_set.returns_json_array = options.returns_array();
        result_set.json_root_name = options.root_name.clone();
        result_set.json_include_nulls = options.include_nulls();
        if !result_set.returns_json_array {
            result_set.json_single_row_guaranteed = Self::single_row_guarantee(query);
        }
        result_set.json_shape = Self::shape(&result_set.columns, options.mode, "");
    }

    /// `Some(true)` for TOP(1), no FROM, or an all-aggregate projection; `Some(false)` with
    /// GROUP BY; unknown otherwise.
    pub fn single_row_guarantee(query: &Query) -> Option<bool> {
        let QueryBody::Select(select) = &query.body else {
            return None;
        };
        if select.top.as_ref().is_some_and(|top| top.is_single_row()) || select.from.is_empty() {
            return Some(true);
        }
        if !select.group_by.is_empty() {
            return Some(false);
        }
        let all_aggregates = !select.projection.is_empty()
            && select.projection.iter().all(|item| match item {
                SelectItem::Expr { expr, .. } => Self::is_top_level_aggregate(expr),
                _ => false,
            });
        if all_aggregates { Some(true) } else { None }
    }

    fn is_top_level_aggregate(expr: &ScalarExpr) -> bool {
        match expr.unnested() {
            ScalarExpr::Function(call) => {
                !call.windowed && call.name.schema.is_none() && AggregateRegistry::shared().is_aggregate(&call.name.name)
            }
            _ => false,
        }
    }

    /// Field tree of JSON output. PATH mode nests dotted names; children of nested JSON
    /// columns hang under their column.
    pub fn shape(columns: &[ResultColumn], mode: ForJsonMode, prefix: &str) -> Vec<JsonFieldNode> {
        let mut nodes = Vec::new();
        for column in columns {
            let segments: Vec<&str> = match mode {
                ForJsonMode::Path => column.name.split('.').collect(),
                ForJsonMode::Auto => vec![column.name.as_str()],
            };
            Self::insert(&mut nodes, &segments, prefix, column);
        }
        nodes
    }

    fn insert(nodes: &mut Vec<JsonFieldNode>, segments: &[&str], prefix: &str, column: &ResultColumn) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        let path = if prefix.is_empty() { head.to_string() } else { format!("{}.{}", prefix, head) };
        if rest.is_empty() {
            let (is_array, children) = match &column.json {
                Some(json) => (json.is_array, Self::shape(&column.children, ForJsonMode::Path, &path)),
                None => (false, Vec::new()),
            };
            nodes.push(JsonFieldNode { name: head.to_string(), path, is_array, children });
            return;
        }
        let index = match nodes.iter().position(|node| node.path == path) {
            Some(index) => index,
            None => {
                nodes.push(JsonFieldNode::leaf(*head, path.clone()));
                nodes.len() - 1
            }
        };
        Self::insert(&mut nodes[index].children, rest, &path, column);
    }

    /// `JSON_QUERY(...)`: the wrapped function becomes the reference, a wrapped subquery
    /// keeps its shape and `'[' + item + ']'` becomes a one-element array shape.
    pub fn json_query(ctx: &mut AnalysisContext, call: &FunctionCall) -> Result<ResultColumn, AnalyzerError> {
        let mut column = match call.args.first().map(ScalarExpr::unnested) {
            Some(ScalarExpr::Function(inner)) if FunctionResolver::is_user_defined(inner) => Self::wrapped_function(ctx, inner),
            Some(ScalarExpr::Subquery(query)) => {
                let mut nested = SubqueryResolver::resolve(ctx, query)?;
                if nested.json.is_none() {
                    let shape_unknown = nested.children.is_empty();
                    nested.json = Some(JsonColumnInfo { shape_unknown, ..Default::default() });
                }
                nested
            }
            Some(expr) => match Self::array_item(expr) {
                Some(item) => {
                    let element = ColumnProvenanceResolver::resolve(ctx, item)?;
                    Self::array_of(element)
                }
                None => {
                    let mut inner = ColumnProvenanceResolver::resolve(ctx, expr)?;
                    if inner.json.is_none() {
                        inner.json = Some(JsonColumnInfo { shape_unknown: true, ..Default::default() });
                    }
                    inner
                }
            },
            None => ResultColumn { json: Some(JsonColumnInfo { shape_unknown: true, ..Default::default() }), ..Default::default() },
        };
        column.sql_type = Some(SqlType::nvarchar_max());
        column.user_type = None;
        column.is_nullable = Some(true);
        column.aggregate = None;
        Ok(column)
    }

    fn wrapped_function(ctx: &AnalysisContext, inner: &FunctionCall) -> ResultColumn {
        let function = FunctionResolver::qualified_name(ctx, inner);
        let children: Option<Vec<ResultColumn>> = ctx.catalog.function_columns(&function).map(|records| {
            records
                .iter()
                .map(|record| {
                    let descriptor = ctx.catalog.resolve_column(record);
                    ResultColumn {
                        name: record.name.clone(),
                        sql_type: Some(descriptor.sql_type),
                        user_type: descriptor.user_type,
                        is_nullable: descriptor.is_nullable,
                        ..Default::default()
                    }
                })
                .collect()
        });
        ResultColumn {
            reference: Some(ObjectReference::new(ObjectKind::Function, &function)),
            json: Some(JsonColumnInfo { shape_unknown: children.is_none(), ..Default::default() }),
            children: children.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// The repeated item of `'[' + X + ']'` (or `CONCAT('[', X, ']')`); for
    /// `X = STRING_AGG(item, sep)` the item is the aggregated expression.
    pub fn array_item(expr: &ScalarExpr) -> Option<&ScalarExpr> {
        let mut parts = Vec::new();
        match expr {
            ScalarExpr::Function(call) if call.name.schema.is_none() && call.lowercase_name() == "concat" => {
                parts.extend(call.args.iter().map(ScalarExpr::unnested));
            }
            _ => Self::concat_operands(expr, &mut parts),
        }
        let [open, middle, close] = parts.as_slice() else {
            return None;
        };
        if !Self::is_text(open, "[") || !Self::is_text(close, "]") {
            return None;
        }
        match middle {
            ScalarExpr::Function(call) if call.name.schema.is_none() && call.lowercase_name() == "string_agg" => {
                call.args.first().map(ScalarExpr::unnested)
            }
            other => Some(*other),
        }
    }

    fn concat_operands<'e>(expr: &'e ScalarExpr, out: &mut Vec<&'e ScalarExpr>) {
        match expr.unnested() {
            ScalarExpr::Binary { left, op: BinaryOperator::Add, right } => {
                Self::concat_operands(left, out);
                Self::concat_operands(right, out);
            }
            other => out.push(other),
        }
    }

    fn is_text(expr: &ScalarExpr, expected: &str) -> bool {
        matches!(expr.as_literal(), Some(Literal::String { value, .. }) if value.trim() == expected)
    }

    fn array_of(element: ResultColumn) -> ResultColumn {
        let shape_unknown = element.is_unresolved();
        let has_fields = element.json.is_some() && !element.children.is_empty();
        let children = if has_fields {
            element.children
        } else {
            let mut element = element;
            if element.name.is_empty() {
                element.name = ARRAY_ITEM_NAME.to_string();
            }
            vec![element]
        };
        ResultColumn {
            json: Some(JsonColumnInfo { is_array: true, shape_unknown, ..Default::default() }),
            children,
            ..Default::default()
        }
    }
}
