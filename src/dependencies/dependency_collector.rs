use std::collections::HashSet;

use crate::{
    ast::ObjectName,
    model::{ObjectKind, ObjectReference, ResultColumn, RoutineModel},
};

/// Gathers the external objects a finished routine model depends on.
pub struct DependencyCollector;

impl DependencyCollector {
    /// Every referenced object once, in first-seen order: result sets and their columns
    /// (depth first), executed procedures, then parameter types.
    pub fn collect(model: &RoutineModel) -> Vec<ObjectReference> {
        let mut collected = Collected::default();
        for result_set in &model.result_sets {
            if let Some(reference) = &result_set.reference {
                collected.add(reference.clone());
            }
            Self::walk(&result_set.columns, &mut collected);
        }
        for executed in &model.executed_routines {
            collected.add(executed.as_reference());
        }
        for parameter_type in &model.parameter_types {
            collected.add(parameter_type.clone());
        }
        collected.references
    }

    fn walk(columns: &[ResultColumn], collected: &mut Collected) {
        for column in columns {
            if let Some(reference) = &column.reference {
                collected.add(reference.clone());
            }
            if let Some(source) = &column.source {
                if let (Some(kind), Some(table)) = (source.object_kind, &source.table) {
                    let name = ObjectName { catalog: None, schema: source.schema.clone(), name: table.clone() };
                    collected.add(ObjectReference::new(kind, &name));
                }
            }
            if let Some(user_type) = &column.user_type {
                collected.add(ObjectReference::new(ObjectKind::UserDefinedType, user_type));
            }
            Self::walk(&column.children, collected);
        }
    }
}

#[derive(Default)]
struct Collected {
    seen: HashSet<(ObjectKind, String, String, String)>,
    references: Vec<ObjectReference>,
}

impl Collected {
    fn add(&mut self, reference: ObjectReference) {
        if self.seen.insert(reference.identity()) {
            self.references.push(reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::SqlType,
        model::{ColumnSource, ExecutedRoutineReference, ResultSet},
    };

    fn table_column(schema: &str, table: &str, column: &str, kind: ObjectKind) -> ResultColumn {
        ResultColumn {
            name: column.to_string(),
            source: Some(ColumnSource {
                schema: Some(schema.to_string()),
                table: Some(table.to_string()),
                column: Some(column.to_string()),
                object_kind: Some(kind),
            }),
            sql_type: Some(SqlType::int()),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupes_case_insensitively_in_first_seen_order() {
        let mut email = table_column("dbo", "Customers", "Email", ObjectKind::Table);
        email.user_type = Some(ObjectName::qualified("dbo", "EmailAddress"));
        let nested = ResultColumn {
            name: "Orders".into(),
            json: Some(Default::default()),
            children: vec![table_column("DBO", "orders", "Id", ObjectKind::Table)],
            ..Default::default()
        };
        let model = RoutineModel {
            result_sets: vec![ResultSet {
                columns: vec![
                    table_column("dbo", "Orders", "Id", ObjectKind::Table),
                    email,
                    nested,
                    table_column("dbo", "ActiveCustomers", "Id", ObjectKind::View),
                ],
                ..Default::default()
            }],
            executed_routines: vec![ExecutedRoutineReference { catalog: None, schema: "dbo".into(), name: "usp_Audit".into() }],
            parameter_types: vec![ObjectReference::new(ObjectKind::UserDefinedType, &ObjectName::qualified("dbo", "emailaddress"))],
        };

        let names: Vec<String> = DependencyCollector::collect(&model).iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec![
                "Table dbo.Orders",
                "Table dbo.Customers",
                "UserDefinedType dbo.EmailAddress",
                "View dbo.ActiveCustomers",
                "Procedure dbo.usp_Audit",
            ]
        );
    }

    #[test]
    fn test_local_tables_are_not_dependencies() {
        let local = ResultColumn {
            name: "Id".into(),
            source: Some(ColumnSource { table: Some("@t".into()), column: Some("Id".into()), ..Default::default() }),
            ..Default::default()
        };
        let model = RoutineModel {
            result_sets: vec![ResultSet { columns: vec![local], ..Default::default() }],
            ..Default::default()
        };
        assert!(DependencyCollector::collect(&model).is_empty());
    }
}
