use std::ops::Range;

use crate::{
    analyzer::{AliasScopeEntry, AnalysisContext, AnalyzerError, ColumnMap, ColumnSourceInfo, QueryResolver},
    ast::{Cte, FunctionCall, ObjectName, OpenJsonColumn, Query, QueryBody, TableSource},
    catalog::SqlType,
    model::{ColumnSource, JsonColumnInfo, ObjectKind, ObjectReference, ResultColumn},
};

/// Pseudo-tables visible to OUTPUT clauses.
pub const PSEUDO_TABLES: [&str; 2] = ["inserted", "deleted"];

pub struct ScopeResolver;

impl ScopeResolver {
    /// Registers one FROM-clause source in the innermost scope and returns the range of
    /// entries it added.
    pub fn register(ctx: &mut AnalysisContext, source: &TableSource) -> Result<Range<usize>, AnalyzerError> {
        let start = ctx.scopes.current_len();
        match source {
            TableSource::Named { name, alias } => Self::register_named(ctx, name, alias.as_deref())?,
            TableSource::Variable { name, alias } => Self::register_local(ctx, name, alias.as_deref()),
            TableSource::Derived { query, alias, columns } => Self::register_derived(ctx, query, alias, columns)?,
            TableSource::Function { call, alias } => Self::register_function(ctx, call, alias.as_deref()),
            TableSource::OpenJson { columns, alias, .. } => Self::register_openjson(ctx, columns, alias.as_deref()),
            TableSource::Join(join) => {
                let left = Self::register(ctx, &join.left)?;
                let right = Self::register(ctx, &join.right)?;
                let (left_nullable, right_nullable) = join.kind.nullable_sides();
                if left_nullable {
                    ctx.scopes.mark_nullable(left);
                }
                if right_nullable {
                    ctx.scopes.mark_nullable(right);
                }
            }
        }
        Ok(start..ctx.scopes.current_len())
    }

    /// Registers a DML target plus the `inserted`/`deleted` pseudo-tables copied from it.
    pub fn register_dml_target(ctx: &mut AnalysisContext, target: &TableSource, pseudo_nullable: bool) -> Result<(), AnalyzerError> {
        let index = match Self::registered_target(ctx, target) {
            Some(index) => index,
            None => Self::register(ctx, target)?.start,
        };
        let Some(mut template) = ctx.scopes.current_entry(index).cloned() else {
            return Ok(());
        };
        template.ensure_columns(ctx.catalog);
        for pseudo in PSEUDO_TABLES {
            let mut entry = template.aliased(pseudo);
            if pseudo_nullable {
                entry.mark_nullable();
            }
            ctx.scopes.add(entry, &[pseudo.to_string()]);
        }
        Ok(())
    }

    /// `UPDATE o ... FROM dbo.Orders o` names its target through a source already in scope.
    fn registered_target(ctx: &AnalysisContext, target: &TableSource) -> Option<usize> {
        let TableSource::Named { name, alias: None } = target else {
            return None;
        };
        let key = match &name.schema {
            Some(schema) => format!("{}.{}", schema, name.name),
            None => name.name.clone(),
        };
        ctx.scopes.current()?.entry_index(&key)
    }

    fn keys(alias: Option<&str>, names: &[String]) -> Vec<String> {
        alias.map(str::to_string).into_iter().chain(names.iter().cloned()).collect()
    }

    fn register_named(ctx: &mut AnalysisContext, name: &ObjectName, alias: Option<&str>) -> Result<(), AnalyzerError> {
        if name.is_local_table() {
            Self::register_local(ctx, &name.name, alias);
            return Ok(());
        }
        if name.schema.is_none() && name.catalog.is_none() {
            if let Some(cte) = ctx.find_cte(&name.name) {
                let columns = Self::cte_columns(ctx, &cte)?;
                let entry = AliasScopeEntry::resolved(cte.name.clone(), alias, Some(columns)).cte();
                ctx.scopes.add(entry, &Self::keys(alias, &[cte.name.clone()]));
                return Ok(());
            }
        }

        let schema = name.schema.clone().unwrap_or_else(|| ctx.default_schema().to_string());
        let object_kind = ctx.catalog.object_kind(name).unwrap_or(ObjectKind::Table);
        let entry = AliasScopeEntry::table(name, &schema, alias, object_kind);
        let mut names = vec![name.name.clone(), format!("{}.{}", schema, name.name)];
        if let Some(catalog) = &name.catalog {
            names.push(format!("{}.{}.{}", catalog, schema, name.name));
        }
        ctx.scopes.add(entry, &Self::keys(alias, &names));
        Ok(())
    }

    /// Table variables, table-valued parameters and temp tables, from the routine bindings.
    fn register_local(ctx: &mut AnalysisContext, name: &str, alias: Option<&str>) {
        let columns = ctx.bindings.table(name).cloned();
        if columns.is_none() {
            tracing::debug!(table = name, "no binding for local table");
        }
        let entry = AliasScopeEntry::resolved(name, alias, columns);
        ctx.scopes.add(entry, &Self::keys(alias, &[name.to_string()]));
    }

    fn register_derived(ctx: &mut AnalysisContext, query: &Query, alias: &str, renames: &[String]) -> Result<(), AnalyzerError> {
        let result_set = QueryResolver::resolve(ctx, query)?;
        let columns = Self::column_map(&result_set.columns, renames);
        ctx.scopes.add(AliasScopeEntry::resolved(alias, None, Some(columns)), &[alias.to_string()]);
        Ok(())
    }

    fn register_function(ctx: &mut AnalysisContext, call: &FunctionCall, alias: Option<&str>) {
        if call.name.schema.is_none() && call.lowercase_name() == "string_split" {
            let columns = Self::typed_columns(&[("value", SqlType::nvarchar(4000), false)]);
            let entry = AliasScopeEntry::resolved(call.name.name.clone(), alias, Some(columns));
            ctx.scopes.add(entry, &Self::keys(alias, &[call.name.name.clone()]));
            return;
        }

        let schema = call.name.schema.clone().unwrap_or_else(|| ctx.default_schema().to_string());
        let function = ObjectName { schema: Some(schema.clone()), ..call.name.clone() };
        let reference = ObjectReference::new(ObjectKind::Function, &function);
        let owner = ColumnSource {
            schema: Some(schema.clone()),
            table: Some(call.name.name.clone()),
            column: None,
            object_kind: Some(ObjectKind::Function),
        };
        let catalog = ctx.catalog;
        let columns = catalog.function_columns(&function).map(|records| {
            records
                .iter()
                .map(|record| {
                    let info = ColumnSourceInfo::from_record(record, catalog, &owner).with_reference(reference.clone());
                    (record.name.to_ascii_lowercase(), info)
                })
                .collect::<ColumnMap>()
        });
        if columns.is_none() {
            tracing::debug!(function = %function, "no column metadata for table-valued function");
        }
        let entry = AliasScopeEntry::resolved(call.name.name.clone(), alias, columns)
            .with_schema(Some(schema))
            .function(ObjectKind::Function);
        ctx.scopes.add(entry, &Self::keys(alias, &[call.name.name.clone()]));
    }

    fn register_openjson(ctx: &mut AnalysisContext, declared: &[OpenJsonColumn], alias: Option<&str>) {
        let columns = if declared.is_empty() {
            Self::typed_columns(&[
                ("key", SqlType::nvarchar(4000), false),
                ("value", SqlType::nvarchar_max(), true),
                ("type", SqlType::new("tinyint"), false),
            ])
        } else {
            declared
                .iter()
                .map(|column| {
                    let mut info = ColumnSourceInfo { name: column.name.clone(), is_nullable: Some(true), ..Default::default() };
                    if column.as_json {
                        info.sql_type = Some(SqlType::nvarchar_max());
                        info.json = Some(JsonColumnInfo { shape_unknown: true, ..Default::default() });
                    } else {
                        let descriptor = ctx.catalog.resolve_data_type(&column.data_type);
                        info.sql_type = Some(descriptor.sql_type);
                        info.user_type = descriptor.user_type;
                    }
                    (column.name.to_ascii_lowercase(), info)
                })
                .collect()
        };
        let entry = AliasScopeEntry::resolved("OPENJSON", alias, Some(columns));
        ctx.scopes.add(entry, &Self::keys(alias, &["OPENJSON".to_string()]));
    }

    fn typed_columns(columns: &[(&str, SqlType, bool)]) -> ColumnMap {
        columns
            .iter()
            .map(|(name, sql_type, is_nullable)| {
                let info = ColumnSourceInfo {
                    name: name.to_string(),
                    sql_type: Some(sql_type.clone()),
                    is_nullable: Some(*is_nullable),
                    ..Default::default()
                };
                (name.to_string(), info)
            })
            .collect()
    }

    /// Column map of projected columns, renamed positionally when names are declared.
    pub fn column_map(columns: &[ResultColumn], renames: &[String]) -> ColumnMap {
        let mut map = ColumnMap::new();
        for (index, column) in columns.iter().enumerate() {
            let name = renames.get(index).unwrap_or(&column.name);
            map.entry(name.to_ascii_lowercase()).or_insert_with(|| ColumnSourceInfo::from_column(column, name));
        }
        map
    }

    /// Columns of a CTE, computed once per statement. A reference made while the CTE's own
    /// columns are being computed sees the anchor branch only.
    pub fn cte_columns(ctx: &mut AnalysisContext, cte: &Cte) -> Result<ColumnMap, AnalyzerError> {
        if let Some(cached) = ctx.cached_cte(&cte.name) {
            return Ok(cached);
        }
        if !ctx.begin_cte(&cte.name) {
            return Ok(ctx.cte_anchor(&cte.name).unwrap_or_else(|| {
                tracing::debug!(cte = %cte.name, "recursive reference without anchor columns");
                ColumnMap::new()
            }));
        }

        let outer_scopes = std::mem::take(&mut ctx.scopes);
        let outcome = Self::compute_cte(ctx, cte);
        ctx.scopes = outer_scopes;
        ctx.end_cte(&cte.name);

        let columns = outcome?;
        ctx.cache_cte(&cte.name, columns.clone());
        Ok(columns)
    }

    fn compute_cte(ctx: &mut AnalysisContext, cte: &Cte) -> Result<ColumnMap, AnalyzerError> {
        if let QueryBody::SetOperation { .. } = &cte.query.body {
            let anchor = QueryResolver::resolve_anchor(ctx, &cte.query)?;
            ctx.set_cte_anchor(&cte.name, Self::column_map(&anchor, &cte.columns));
        }
        let result_set = QueryResolver::resolve(ctx, &cte.query)?;
        Ok(Self::column_map(&result_set.columns, &cte.columns))
    }
}
