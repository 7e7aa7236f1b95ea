use crate::ast::{ColumnDefinition, DataTypeRef, ObjectName, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    Procedure,
    ScalarFunction,
    TableFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub data_type: DataTypeRef,
    pub is_output: bool,
    pub is_readonly: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataTypeRef) -> Self {
        Self { name: name.into(), data_type, is_output: false, is_readonly: false }
    }

    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }
}

/// A parsed procedure or function, as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Routine {
    pub kind: RoutineKind,
    pub name: ObjectName,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    /// `RETURNS @result TABLE (...)` of a multi-statement table function.
    pub return_table: Option<(String, Vec<ColumnDefinition>)>,
    pub source_text: Option<String>,
}

impl Routine {
    pub fn procedure(name: impl Into<ObjectName>, body: Vec<Statement>) -> Self {
        Self {
            kind: RoutineKind::Procedure,
            name: name.into(),
            parameters: Vec::new(),
            body,
            return_table: None,
            source_text: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }
}
