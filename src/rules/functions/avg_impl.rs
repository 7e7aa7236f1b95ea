use crate::{catalog::SqlType, rules::{AggregateImpl, AggregateOperand, AggregateTyping}};

pub struct AvgImpl;

impl AggregateImpl for AvgImpl {
    fn name(&self) -> &'static str { "avg" }

    fn infer_type(&self, operand: &AggregateOperand) -> AggregateTyping {
        let sql_type = match &operand.sql_type {
            Some(t) if t.is_money() => t.clone(),
            Some(t) if t.is_approximate() => SqlType::float(),
            _ => SqlType::decimal(38, 6),
        };
        AggregateTyping::nullable(sql_type)
    }
}
