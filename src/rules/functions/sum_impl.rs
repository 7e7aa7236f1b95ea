use crate::{catalog::SqlType, rules::{AggregateImpl, AggregateOperand, AggregateTyping, LiteralHint}};

pub struct SumImpl;

impl AggregateImpl for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn infer_type(&self, operand: &AggregateOperand) -> AggregateTyping {
        let fallback = SqlType::decimal(38, 10);
        let sql_type = match &operand.sql_type {
            Some(t) if t.base_type == "bigint" => SqlType::bigint(),
            Some(t) if t.is_integer() => SqlType::int(),
            Some(t) if t.is_exact_decimal() => match t.precision {
                Some(precision) => SqlType::decimal(precision, t.scale.unwrap_or(0)),
                None => fallback,
            },
            Some(t) if t.is_money() || t.is_approximate() => t.clone(),
            _ => match operand.literal {
                Some(LiteralHint::Integer) => SqlType::int(),
                Some(LiteralHint::Decimal) | None => fallback,
            },
        };
        AggregateTyping::nullable(sql_type)
    }
}
