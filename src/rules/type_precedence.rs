use crate::catalog::SqlType;

/// Result-type precedence for binary expressions and conditional branches.
///
/// Tiers, highest first: `sql_variant`, date/time, approximate and exact numerics and money,
/// integers, `bit`, large character/binary (`text`, `xml`, `(max)` types), character/binary,
/// `uniqueidentifier`. Anything unrecognized ranks lowest.
pub struct TypePrecedence;

impl TypePrecedence {
    pub fn rank(sql_type: &SqlType) -> u8 {
        if sql_type.is_length_bearing() && sql_type.is_max() {
            return 40;
        }
        match sql_type.base_type.as_str() {
            "sql_variant" => 90,
            "datetimeoffset" => 85,
            "datetime2" => 84,
            "datetime" => 83,
            "smalldatetime" => 82,
            "date" => 81,
            "time" => 80,
            "float" => 74,
            "real" => 73,
            "decimal" | "numeric" => 72,
            "money" => 71,
            "smallmoney" => 70,
            "bigint" => 63,
            "int" => 62,
            "smallint" => 61,
            "tinyint" => 60,
            "bit" => 50,
            "xml" | "ntext" | "text" | "image" => 40,
            "nvarchar" => 34,
            "nchar" => 33,
            "varchar" => 32,
            "char" => 31,
            "varbinary" => 30,
            "binary" => 29,
            "uniqueidentifier" => 20,
            _ => 0,
        }
    }

    /// The operand type that wins; ties keep the left operand.
    pub fn dominant<'a>(left: &'a SqlType, right: &'a SqlType) -> &'a SqlType {
        if Self::rank(right) > Self::rank(left) { right } else { left }
    }

    /// Folds one more type into an accumulated result type. Identical base types widen
    /// their facets instead of picking a side.
    pub fn merge(acc: Option<SqlType>, next: Option<&SqlType>) -> Option<SqlType> {
        match (acc, next) {
            (None, None) => None,
            (Some(acc), None) => Some(acc),
            (None, Some(next)) => Some(next.clone()),
            (Some(acc), Some(next)) if acc.base_type == next.base_type => Some(Self::widen(acc, next)),
            (Some(acc), Some(next)) => Some(Self::dominant(&acc, next).clone()),
        }
    }

    fn widen(mut acc: SqlType, next: &SqlType) -> SqlType {
        acc.max_length = match (acc.max_length, next.max_length) {
            (Some(a), _) if a < 0 => Some(a),
            (_, Some(b)) if b < 0 => Some(b),
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        acc.precision = acc.precision.max(next.precision);
        acc.scale = acc.scale.max(next.scale);
        acc
    }

    /// Nullable when either side is; not nullable only when both sides are known not to be.
    pub fn either_nullable(left: Option<bool>, right: Option<bool>) -> Option<bool> {
        match (left, right) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        let ordered = [
            SqlType::new("sql_variant"),
            SqlType::new("datetime2"),
            SqlType::decimal(10, 2),
            SqlType::int(),
            SqlType::bit(),
            SqlType::nvarchar_max(),
            SqlType::nvarchar(20),
            SqlType::uniqueidentifier(),
        ];
        for pair in ordered.windows(2) {
            assert!(TypePrecedence::rank(&pair[0]) > TypePrecedence::rank(&pair[1]), "{} vs {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_dominant_picks_higher_rank() {
        let int = SqlType::int();
        let money = SqlType::money();
        assert_eq!(TypePrecedence::dominant(&int, &money), &money);
        assert_eq!(TypePrecedence::dominant(&money, &int), &money);
        let other = SqlType::int();
        assert!(std::ptr::eq(TypePrecedence::dominant(&int, &other), &int));
    }

    #[test]
    fn test_merge_widens_same_base() {
        let merged = TypePrecedence::merge(Some(SqlType::nvarchar(10)), Some(&SqlType::nvarchar(40)));
        assert_eq!(merged, Some(SqlType::nvarchar(40)));
        let merged = TypePrecedence::merge(Some(SqlType::nvarchar(10)), Some(&SqlType::nvarchar_max()));
        assert_eq!(merged, Some(SqlType::nvarchar_max()));
        let merged = TypePrecedence::merge(Some(SqlType::decimal(10, 2)), Some(&SqlType::decimal(8, 4)));
        assert_eq!(merged, Some(SqlType::decimal(10, 4)));
        assert_eq!(TypePrecedence::merge(None, Some(&SqlType::int())), Some(SqlType::int()));
    }

    #[test]
    fn test_either_nullable() {
        assert_eq!(TypePrecedence::either_nullable(Some(false), Some(true)), Some(true));
        assert_eq!(TypePrecedence::either_nullable(Some(false), Some(false)), Some(false));
        assert_eq!(TypePrecedence::either_nullable(Some(false), None), None);
        assert_eq!(TypePrecedence::either_nullable(None, Some(true)), Some(true));
    }
}
