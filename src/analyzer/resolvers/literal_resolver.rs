use crate::{
    ast::{Literal, ScalarExpr},
    catalog::SqlType,
    model::ResultColumn,
    rules::LiteralHint,
};

pub struct LiteralResolver;

impl LiteralResolver {
    /// Typed column for a literal. `NULL` is nullable with no type.
    pub fn resolve(literal: &Literal) -> ResultColumn {
        match literal {
            Literal::Null => ResultColumn { is_nullable: Some(true), ..Default::default() },
            Literal::Int(value) => {
                let sql_type = if i32::try_from(*value).is_ok() { SqlType::int() } else { SqlType::bigint() };
                ResultColumn::typed(sql_type, false)
            }
            Literal::Decimal(text) => {
                let (precision, scale) = Literal::decimal_precision_scale(text);
                ResultColumn::typed(SqlType::decimal(precision, scale), false)
            }
            Literal::Real(_) => ResultColumn::typed(SqlType::float(), false),
            Literal::Money(_) => ResultColumn::typed(SqlType::money(), false),
            Literal::String { value, unicode } => {
                let length = value.chars().count().max(1) as i32;
                let sql_type = if *unicode { SqlType::nvarchar(length) } else { SqlType::varchar(length) };
                ResultColumn::typed(sql_type, false)
            }
            Literal::Binary(hex) => {
                let length = (hex.len() / 2).max(1) as i32;
                ResultColumn::typed(SqlType::new("varbinary").with_length(length), false)
            }
        }
    }

    /// Strongest numeric literal kind found anywhere in `expr`.
    pub fn literal_hint(expr: &ScalarExpr) -> Option<LiteralHint> {
        let merge = |a: Option<LiteralHint>, b: Option<LiteralHint>| match (a, b) {
            (Some(LiteralHint::Decimal), _) | (_, Some(LiteralHint::Decimal)) => Some(LiteralHint::Decimal),
            (Some(LiteralHint::Integer), _) | (_, Some(LiteralHint::Integer)) => Some(LiteralHint::Integer),
            _ => None,
        };
        match expr {
            ScalarExpr::Literal(Literal::Int(_)) => Some(LiteralHint::Integer),
            ScalarExpr::Literal(Literal::Decimal(_) | Literal::Real(_) | Literal::Money(_)) => Some(LiteralHint::Decimal),
            ScalarExpr::Nested(inner) | ScalarExpr::Unary { expr: inner, .. } => Self::literal_hint(inner),
            ScalarExpr::Binary { left, right, .. } => merge(Self::literal_hint(left), Self::literal_hint(right)),
            ScalarExpr::Iif { then, otherwise, .. } => merge(Self::literal_hint(then), Self::literal_hint(otherwise)),
            ScalarExpr::Case { whens, else_result, .. } => {
                let branches = whens.iter().map(|when| Self::literal_hint(&when.result));
                let otherwise = else_result.as_deref().and_then(Self::literal_hint);
                branches.fold(otherwise, merge)
            }
            ScalarExpr::Coalesce(args) => args.iter().map(Self::literal_hint).fold(None, merge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, WhenClause};

    #[test]
    fn test_integer_width_follows_range() {
        assert_eq!(LiteralResolver::resolve(&Literal::Int(42)).sql_type, Some(SqlType::int()));
        assert_eq!(LiteralResolver::resolve(&Literal::Int(3_000_000_000)).sql_type, Some(SqlType::bigint()));
        assert_eq!(LiteralResolver::resolve(&Literal::Int(42)).is_nullable, Some(false));
    }

    #[test]
    fn test_string_length_has_floor_of_one() {
        assert_eq!(LiteralResolver::resolve(&Literal::string("abc")).sql_type, Some(SqlType::varchar(3)));
        assert_eq!(LiteralResolver::resolve(&Literal::nstring("")).sql_type, Some(SqlType::nvarchar(1)));
    }

    #[test]
    fn test_null_and_decimal() {
        let null = LiteralResolver::resolve(&Literal::Null);
        assert_eq!(null.is_nullable, Some(true));
        assert!(null.sql_type.is_none());
        assert_eq!(LiteralResolver::resolve(&Literal::decimal("12.50")).sql_type, Some(SqlType::decimal(4, 2)));
    }

    #[test]
    fn test_literal_hint_prefers_decimal() {
        let case = ScalarExpr::Case {
            operand: None,
            whens: vec![WhenClause { condition: ScalarExpr::column("Flag"), result: ScalarExpr::int(1) }],
            else_result: Some(Box::new(ScalarExpr::int(0))),
        };
        assert_eq!(LiteralResolver::literal_hint(&case), Some(LiteralHint::Integer));

        let scaled = ScalarExpr::binary(ScalarExpr::column("Qty"), BinaryOperator::Multiply, ScalarExpr::Literal(Literal::decimal("1.5")));
        assert_eq!(LiteralResolver::literal_hint(&scaled), Some(LiteralHint::Decimal));
        assert_eq!(LiteralResolver::literal_hint(&ScalarExpr::column("Qty")), None);
    }
}
