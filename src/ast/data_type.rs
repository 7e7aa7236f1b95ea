use std::fmt;

use crate::ast::ObjectName;

/// Length value used by the parser for `(max)`.
pub const MAX_LENGTH: i32 = -1;

/// A data type as written in a declaration, cast or column definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataTypeRef {
    pub name: ObjectName,
    pub length: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
}

impl DataTypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: ObjectName::bare(name), length: None, precision: None, scale: None }
    }

    pub fn user(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self { name: ObjectName::qualified(schema, name), length: None, precision: None, scale: None }
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn max(mut self) -> Self {
        self.length = Some(MAX_LENGTH);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl fmt::Display for DataTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (self.length, self.precision, self.scale) {
            (Some(length), _, _) if length < 0 => write!(f, "(max)"),
            (Some(length), _, _) => write!(f, "({})", length),
            (None, Some(precision), Some(scale)) => write!(f, "({},{})", precision, scale),
            (None, Some(precision), None) => write!(f, "({})", precision),
            (None, None, Some(scale)) => write!(f, "({})", scale),
            (None, None, None) => Ok(()),
        }
    }
}
