use serde::{Deserialize, Serialize};

use crate::model::{ExecutedRoutineReference, ObjectReference, ResultColumn, ResultSet};

/// Everything inferred about one routine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineModel {
    pub result_sets: Vec<ResultSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executed_routines: Vec<ExecutedRoutineReference>,
    /// User-defined scalar and table types used by parameters and declared variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_types: Vec<ObjectReference>,
}

impl RoutineModel {
    /// Paths (`ResultSets/0/Columns/Total/...`) of every column that carries only a name.
    pub fn unresolved_columns(&self) -> Vec<String> {
        fn visit(columns: &[ResultColumn], trail: &str, out: &mut Vec<String>) {
            for column in columns {
                let path = format!("{}/{}", trail, column.name);
                if column.is_unresolved() {
                    out.push(path.clone());
                }
                visit(&column.children, &format!("{}/Columns", path), out);
            }
        }

        let mut out = Vec::new();
        for (index, result_set) in self.result_sets.iter().enumerate() {
            visit(&result_set.columns, &format!("ResultSets/{}/Columns", index), &mut out);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqlType;

    #[test]
    fn test_unresolved_columns_walks_children() {
        let mut resolved = ResultColumn::typed(SqlType::int(), false);
        resolved.name = "Id".into();
        let unresolved_child = ResultColumn { name: "Mystery".into(), ..Default::default() };
        let container = ResultColumn {
            name: "Lines".into(),
            json: Some(Default::default()),
            children: vec![unresolved_child],
            ..Default::default()
        };
        let lonely = ResultColumn { name: "Column3".into(), ..Default::default() };
        let model = RoutineModel {
            result_sets: vec![ResultSet { columns: vec![resolved, container, lonely], ..Default::default() }],
            ..Default::default()
        };

        assert_eq!(
            model.unresolved_columns(),
            vec!["ResultSets/0/Columns/Lines/Columns/Mystery".to_string(), "ResultSets/0/Columns/Column3".to_string()]
        );
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let mut column = ResultColumn::typed(SqlType::int(), false);
        column.name = "Total".into();
        let model = RoutineModel {
            result_sets: vec![ResultSet { columns: vec![column], ..Default::default() }],
            ..Default::default()
        };
        let json = model.to_json();
        let column = &json["result_sets"][0]["columns"][0];
        assert_eq!(column["name"], "Total");
        assert_eq!(column["sql_type"]["base_type"], "int");
        assert!(column.get("children").is_none());
        assert!(json.get("executed_routines").is_none());
    }
}
