use crate::{catalog::SqlType, rules::AggregateRegistry};

/// How the result type of a built-in function is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltinRule {
    /// Delegated to the [`AggregateRegistry`].
    Aggregate,
    /// Fixed type; `None` nullability follows the arguments.
    Fixed { sql_type: SqlType, is_nullable: Option<bool> },
    /// Metadata of argument `arg` passes through unchanged.
    PassThrough { arg: usize },
    /// `CONCAT`, `CONCAT_WS`, `STRING_AGG`.
    UnboundedText,
    /// `JSON_QUERY`, which returns a JSON fragment.
    JsonQuery,
    IsNull,
    Coalesce,
    NullIf,
}

pub struct BuiltinFunctions;

impl BuiltinFunctions {
    fn fixed(sql_type: SqlType, is_nullable: Option<bool>) -> Option<BuiltinRule> {
        Some(BuiltinRule::Fixed { sql_type, is_nullable })
    }

    /// Rule for an unqualified function name, `None` for user-defined functions.
    pub fn classify(name: &str) -> Option<BuiltinRule> {
        let lname = name.to_ascii_lowercase();
        if AggregateRegistry::shared().is_aggregate(&lname) {
            return Some(BuiltinRule::Aggregate);
        }
        match lname.as_str() {
            "rowcount_big" => Self::fixed(SqlType::bigint(), Some(false)),
            "row_number" | "rank" | "dense_rank" | "ntile" => Self::fixed(SqlType::bigint(), Some(false)),
            "getdate" | "getutcdate" | "current_timestamp" => Self::fixed(SqlType::new("datetime"), Some(false)),
            "sysdatetime" | "sysutcdatetime" => Self::fixed(SqlType::new("datetime2").with_scale(7), Some(false)),
            "sysdatetimeoffset" => Self::fixed(SqlType::new("datetimeoffset").with_scale(7), Some(false)),
            "newid" | "newsequentialid" => Self::fixed(SqlType::uniqueidentifier(), Some(false)),
            "len" | "datalength" | "charindex" | "patindex" | "datediff" | "datepart" | "year" | "month"
            | "day" | "isjson" | "checksum" | "binary_checksum" | "unicode" | "ascii" | "isnumeric" => {
                Self::fixed(SqlType::int(), None)
            }
            "datediff_big" => Self::fixed(SqlType::bigint(), None),
            "scope_identity" | "ident_current" => Self::fixed(SqlType::decimal(38, 0), Some(true)),
            "json_value" | "format" => Self::fixed(SqlType::nvarchar(4000), Some(true)),
            "json_modify" => Self::fixed(SqlType::nvarchar_max(), Some(true)),
            "datename" => Self::fixed(SqlType::nvarchar(30), None),
            "user_name" | "suser_sname" | "db_name" | "object_name" | "schema_name" | "host_name" | "app_name"
            | "error_procedure" => Self::fixed(SqlType::nvarchar(128), Some(true)),
            "error_message" => Self::fixed(SqlType::nvarchar(4000), Some(true)),
            "error_number" | "error_severity" | "error_state" | "error_line" => Self::fixed(SqlType::int(), Some(true)),
            "concat" | "concat_ws" | "string_agg" => Some(BuiltinRule::UnboundedText),
            "upper" | "lower" | "ltrim" | "rtrim" | "trim" | "reverse" | "left" | "right" | "substring"
            | "abs" | "round" | "floor" | "ceiling" | "sign" => Some(BuiltinRule::PassThrough { arg: 0 }),
            "dateadd" => Some(BuiltinRule::PassThrough { arg: 2 }),
            "json_query" => Some(BuiltinRule::JsonQuery),
            "isnull" => Some(BuiltinRule::IsNull),
            "coalesce" => Some(BuiltinRule::Coalesce),
            "nullif" => Some(BuiltinRule::NullIf),
            _ => None,
        }
    }

    /// Type of a global variable such as `@@ROWCOUNT`.
    pub fn global_variable(name: &str) -> Option<(SqlType, bool)> {
        match name.to_ascii_lowercase().as_str() {
            "@@rowcount" | "@@error" | "@@trancount" | "@@fetch_status" | "@@spid" => Some((SqlType::int(), false)),
            "@@identity" => Some((SqlType::decimal(38, 0), true)),
            "@@servername" | "@@servicename" => Some((SqlType::nvarchar(128), true)),
            "@@version" => Some((SqlType::nvarchar(300), false)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(BuiltinFunctions::classify("COUNT"), Some(BuiltinRule::Aggregate));
        assert_eq!(
            BuiltinFunctions::classify("ROWCOUNT_BIG"),
            Some(BuiltinRule::Fixed { sql_type: SqlType::bigint(), is_nullable: Some(false) })
        );
        assert_eq!(BuiltinFunctions::classify("string_agg"), Some(BuiltinRule::UnboundedText));
        assert_eq!(BuiltinFunctions::classify("Upper"), Some(BuiltinRule::PassThrough { arg: 0 }));
        assert_eq!(BuiltinFunctions::classify("JSON_QUERY"), Some(BuiltinRule::JsonQuery));
        assert_eq!(BuiltinFunctions::classify("fn_TotalFor"), None);
    }

    #[test]
    fn test_global_variables() {
        assert_eq!(BuiltinFunctions::global_variable("@@ROWCOUNT"), Some((SqlType::int(), false)));
        assert_eq!(BuiltinFunctions::global_variable("@@nope"), None);
    }
}
