use crate::{catalog::SqlType, rules::{AggregateImpl, AggregateOperand, AggregateTyping}};

/// `STDEV`, `STDEVP`, `VAR`, `VARP`.
pub struct StatisticalImpl(pub &'static str);

impl AggregateImpl for StatisticalImpl {
    fn name(&self) -> &'static str { self.0 }

    fn infer_type(&self, _operand: &AggregateOperand) -> AggregateTyping {
        AggregateTyping::nullable(SqlType::float())
    }
}
