use crate::rules::{AggregateImpl, AggregateOperand, AggregateTyping};

fn pass_through(operand: &AggregateOperand) -> AggregateTyping {
    AggregateTyping { sql_type: operand.sql_type.clone(), is_nullable: operand.is_nullable }
}

pub struct MinImpl;
impl AggregateImpl for MinImpl {
    fn name(&self) -> &'static str { "min" }
    fn infer_type(&self, operand: &AggregateOperand) -> AggregateTyping { pass_through(operand) }
}

pub struct MaxImpl;
impl AggregateImpl for MaxImpl {
    fn name(&self) -> &'static str { "max" }
    fn infer_type(&self, operand: &AggregateOperand) -> AggregateTyping { pass_through(operand) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqlType;

    #[test]
    fn test_min_max_pass_type_and_nullability_through() {
        let operand = AggregateOperand::of(SqlType::nvarchar(30), false);
        assert_eq!(MinImpl.infer_type(&operand), AggregateTyping { sql_type: Some(SqlType::nvarchar(30)), is_nullable: Some(false) });
        assert_eq!(MaxImpl.infer_type(&operand).sql_type, Some(SqlType::nvarchar(30)));
        assert_eq!(MaxImpl.infer_type(&AggregateOperand::default()), AggregateTyping::default());
    }
}
