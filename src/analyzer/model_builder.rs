use std::collections::HashSet;

use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnMap, ColumnProvenanceResolver, ColumnSourceInfo, PSEUDO_TABLES, QueryResolver, ScopeResolver},
    ast::{ColumnDefinition, Cte, ExecuteStatement, InsertSource, ObjectName, OutputClause, Parameter, Query, Routine, RoutineKind, ScalarExpr, Statement, TableSource, VariableDeclaration},
    catalog::{ColumnRecord, TypeCatalog, TypeDescriptor},
    config::AnalyzerConfig,
    model::{ColumnSource, ExecutedRoutineReference, ObjectKind, ObjectReference, ResultSet, RoutineModel},
};

/// Walks one routine body and collects the result sets it returns to the client.
///
/// A builder owns its whole analysis state (scope stack, CTE cache, variable bindings)
/// and is used for exactly one routine.
pub struct ProcedureSemanticModelBuilder<'a> {
    ctx: AnalysisContext<'a>,
    model: RoutineModel,
    returns_table: bool,
    /// Lowercase names of scalar variables declared with a type the catalog does not know.
    untyped: HashSet<String>,
}

impl<'a> ProcedureSemanticModelBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog, config: &'a AnalyzerConfig) -> Self {
        Self {
            ctx: AnalysisContext::new(catalog, config),
            model: RoutineModel::default(),
            returns_table: false,
            untyped: HashSet::new(),
        }
    }

    pub fn build(catalog: &TypeCatalog, config: &AnalyzerConfig, routine: &Routine) -> Result<RoutineModel, AnalyzerError> {
        // unqualified names resolve against the configured schema, not the one the catalog was built with
        let catalog = catalog.with_default_schema(&config.default_schema);
        let mut builder = ProcedureSemanticModelBuilder::new(&catalog, config);
        builder.returns_table = routine.kind == RoutineKind::TableFunction;

        // 1) parameters and the declared return table
        builder.bind_parameters(&routine.parameters);
        if let Some((name, columns)) = &routine.return_table {
            builder.declare_table(name, columns);
        }

        // 2) body, in source order
        builder.visit_all(&routine.body)?;

        // 3) a multi-statement table function returns its declared table
        if let Some((name, _)) = &routine.return_table {
            builder.push_table_result(name);
        }

        tracing::debug!(
            routine = %routine.name,
            result_sets = builder.model.result_sets.len(),
            executed = builder.model.executed_routines.len(),
            "routine model built"
        );
        Ok(builder.model)
    }

    fn bind_parameters(&mut self, parameters: &[Parameter]) {
        for parameter in parameters {
            let type_name = &parameter.data_type.name;
            if let Some(records) = self.ctx.catalog.table_type_columns(type_name) {
                let columns = self.record_columns(&records, &parameter.name);
                self.ctx.bindings.bind_table(&parameter.name, columns);
                let table_type = self.qualified(type_name);
                self.record_type_usage(ObjectReference::new(ObjectKind::TableType, &table_type));
                continue;
            }

            let descriptor = self.ctx.catalog.resolve_data_type(&parameter.data_type);
            if let Some(user_type) = &descriptor.user_type {
                self.record_type_usage(ObjectReference::new(ObjectKind::UserDefinedType, user_type));
            }
            self.ctx.bindings.bind_scalar(&parameter.name, descriptor);
        }
    }

    fn record_type_usage(&mut self, reference: ObjectReference) {
        let identity = reference.identity();
        if !self.model.parameter_types.iter().any(|known| known.identity() == identity) {
            self.model.parameter_types.push(reference);
        }
    }

    fn record_columns(&self, records: &[ColumnRecord], owner: &str) -> ColumnMap {
        let source = ColumnSource { table: Some(owner.to_string()), ..Default::default() };
        records
            .iter()
            .map(|record| (record.name.to_ascii_lowercase(), ColumnSourceInfo::from_record(record, self.ctx.catalog, &source)))
            .collect()
    }

    fn qualified(&self, name: &ObjectName) -> ObjectName {
        let mut name = name.clone();
        if name.schema.is_none() {
            name.schema = Some(self.ctx.default_schema().to_string());
        }
        name
    }

    fn visit_all(&mut self, statements: &[Statement]) -> Result<(), AnalyzerError> {
        for statement in statements {
            self.visit(statement)?;
        }
        Ok(())
    }

    fn visit(&mut self, statement: &Statement) -> Result<(), AnalyzerError> {
        match statement {
            Statement::Block(statements) => self.visit_all(statements),
            Statement::If { then, otherwise, .. } => {
                self.visit(then)?;
                match otherwise {
                    Some(otherwise) => self.visit(otherwise),
                    None => Ok(()),
                }
            }
            Statement::While { body, .. } => self.visit(body),
            Statement::TryCatch { try_block, catch_block } => {
                self.visit_all(try_block)?;
                self.visit_all(catch_block)
            }
            other => {
                self.ctx.next_statement();
                self.visit_leaf(other)
            }
        }
    }

    fn visit_leaf(&mut self, statement: &Statement) -> Result<(), AnalyzerError> {
        match statement {
            Statement::Select(query) => self.visit_select(query),
            Statement::Insert(insert) => {
                if let InsertSource::Execute(execute) = &insert.source {
                    self.record_execute(execute);
                }
                match &insert.output {
                    Some(output) => self.visit_output(&insert.ctes, &insert.target, &[], output, false),
                    None => Ok(()),
                }
            }
            Statement::Update(dml) | Statement::Delete(dml) => match &dml.output {
                Some(output) => self.visit_output(&dml.ctes, &dml.target, &dml.from, output, false),
                None => Ok(()),
            },
            Statement::Merge(merge) => match &merge.output {
                Some(output) => self.visit_output(&merge.ctes, &merge.target, std::slice::from_ref(&merge.source), output, true),
                None => Ok(()),
            },
            Statement::Execute(execute) => {
                self.record_execute(execute);
                Ok(())
            }
            Statement::Declare(declarations) => {
                for declaration in declarations {
                    self.declare_variable(declaration)?;
                }
                Ok(())
            }
            Statement::SetVariable { name, expr } => self.assign_variable(name, expr),
            Statement::DeclareTable { name, columns } => {
                self.declare_table(name, columns);
                Ok(())
            }
            // inline table function: RETURN (SELECT ...)
            Statement::Return(Some(ScalarExpr::Subquery(query))) if self.returns_table => self.visit_select(query),
            Statement::Return(_) | Statement::Other(_) => Ok(()),
            // compound statements never reach here
            Statement::Block(_) | Statement::If { .. } | Statement::While { .. } | Statement::TryCatch { .. } => Ok(()),
        }
    }

    /// A top-level query: `SELECT ... INTO` creates a temp table binding, anything else that
    /// projects visible columns is a result set.
    fn visit_select(&mut self, query: &Query) -> Result<(), AnalyzerError> {
        let result_set = QueryResolver::resolve(&mut self.ctx, query)?;
        if let Some(target) = query.first_select().and_then(|select| select.into.as_deref()) {
            let columns = ScopeResolver::column_map(&result_set.columns, &[]);
            self.ctx.bindings.bind_table(target, columns);
            return Ok(());
        }
        if query.projects_visible_columns() {
            self.model.result_sets.push(result_set);
        }
        Ok(())
    }

    /// `OUTPUT` sent to the client. Output redirected with `INTO` returns nothing.
    fn visit_output(&mut self, ctes: &[Cte], target: &TableSource, sources: &[TableSource], output: &OutputClause, pseudo_nullable: bool) -> Result<(), AnalyzerError> {
        if output.into.is_some() {
            return Ok(());
        }

        self.ctx.scopes.push();
        self.ctx.push_ctes(ctes);
        let outcome = self.resolve_output(target, sources, output, pseudo_nullable);
        let reference = self.target_reference();
        self.ctx.pop_ctes();
        self.ctx.scopes.pop();

        let mut result_set = outcome?;
        result_set.reference = reference;
        self.model.result_sets.push(result_set);
        Ok(())
    }

    fn resolve_output(&mut self, target: &TableSource, sources: &[TableSource], output: &OutputClause, pseudo_nullable: bool) -> Result<ResultSet, AnalyzerError> {
        // MERGE names its target before USING; UPDATE/DELETE may alias the target in FROM
        if pseudo_nullable {
            ScopeResolver::register_dml_target(&mut self.ctx, target, pseudo_nullable)?;
            for source in sources {
                ScopeResolver::register(&mut self.ctx, source)?;
            }
        } else {
            for source in sources {
                ScopeResolver::register(&mut self.ctx, source)?;
            }
            ScopeResolver::register_dml_target(&mut self.ctx, target, pseudo_nullable)?;
        }
        QueryResolver::resolve_items(&mut self.ctx, &output.items)
    }

    /// The catalog object behind the DML target, read from its `inserted` copy.
    fn target_reference(&self) -> Option<ObjectReference> {
        let scope = self.ctx.scopes.current()?;
        let entry = scope.entries().get(scope.entry_index(PSEUDO_TABLES[0])?)?;
        let kind = entry.object_kind?;
        Some(ObjectReference {
            kind,
            catalog: entry.catalog.clone(),
            schema: entry.schema.clone(),
            name: entry.name.clone(),
        })
    }

    fn record_execute(&mut self, execute: &ExecuteStatement) {
        let procedure = &execute.procedure;
        self.model.executed_routines.push(ExecutedRoutineReference {
            catalog: procedure.catalog.clone(),
            schema: procedure.schema.clone().unwrap_or_else(|| self.ctx.default_schema().to_string()),
            name: procedure.name.clone(),
        });
    }

    /// `DECLARE @v type [= default]` binds a scalar; a table-type declaration binds a table
    /// variable. A type the catalog does not know takes the default's type when it has one.
    fn declare_variable(&mut self, declaration: &VariableDeclaration) -> Result<(), AnalyzerError> {
        let data_type = &declaration.data_type;
        if let Some(records) = self.ctx.catalog.table_type_columns(&data_type.name) {
            let columns = self.record_columns(&records, &declaration.name);
            self.ctx.bindings.bind_table(&declaration.name, columns);
            let table_type = self.qualified(&data_type.name);
            self.record_type_usage(ObjectReference::new(ObjectKind::TableType, &table_type));
            return Ok(());
        }

        let resolved = self.ctx.catalog.resolve(&data_type.name, data_type.length, data_type.precision, data_type.scale);
        let descriptor = match resolved {
            Some(descriptor) => {
                if let Some(user_type) = &descriptor.user_type {
                    self.record_type_usage(ObjectReference::new(ObjectKind::UserDefinedType, user_type));
                }
                descriptor
            }
            None => {
                let inferred = match &declaration.default {
                    Some(default) => self.expression_type(default)?,
                    None => None,
                };
                match inferred {
                    Some(descriptor) => descriptor,
                    None => {
                        self.untyped.insert(declaration.name.to_ascii_lowercase());
                        self.ctx.catalog.resolve_data_type(data_type)
                    }
                }
            }
        };
        self.ctx.bindings.bind_scalar(&declaration.name, descriptor);
        Ok(())
    }

    /// `SET @v = expr` types a variable only when no declaration did.
    fn assign_variable(&mut self, name: &str, expr: &ScalarExpr) -> Result<(), AnalyzerError> {
        let key = name.to_ascii_lowercase();
        if self.ctx.bindings.scalar(name).is_some() && !self.untyped.contains(&key) {
            return Ok(());
        }
        if let Some(descriptor) = self.expression_type(expr)? {
            self.ctx.bindings.bind_scalar(name, descriptor);
            self.untyped.remove(&key);
        }
        Ok(())
    }

    fn expression_type(&mut self, expr: &ScalarExpr) -> Result<Option<TypeDescriptor>, AnalyzerError> {
        let column = ColumnProvenanceResolver::resolve(&mut self.ctx, expr)?;
        Ok(column.sql_type.map(|sql_type| TypeDescriptor { sql_type, user_type: column.user_type, is_nullable: None }))
    }

    fn declare_table(&mut self, name: &str, columns: &[ColumnDefinition]) {
        let map = columns
            .iter()
            .map(|column| (column.name.to_ascii_lowercase(), ColumnSourceInfo::from_definition(column, self.ctx.catalog, name)))
            .collect();
        self.ctx.bindings.bind_table(name, map);
    }

    fn push_table_result(&mut self, name: &str) {
        let Some(columns) = self.ctx.bindings.table(name) else {
            return;
        };
        let columns = columns.values().map(|info| info.project(name, false)).collect();
        self.model.result_sets.push(ResultSet { columns, ..Default::default() });
    }
}
