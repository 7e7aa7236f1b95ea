use crate::{catalog::SqlType, rules::{AggregateImpl, AggregateOperand, AggregateTyping}};

/// `COUNT` and `COUNT_BIG`: never null, whatever the operand.
pub struct CountImpl {
    name: &'static str,
    big: bool,
}

impl CountImpl {
    pub const COUNT: CountImpl = CountImpl { name: "count", big: false };
    pub const COUNT_BIG: CountImpl = CountImpl { name: "count_big", big: true };
}

impl AggregateImpl for CountImpl {
    fn name(&self) -> &'static str { self.name }

    fn infer_type(&self, _operand: &AggregateOperand) -> AggregateTyping {
        let sql_type = if self.big { SqlType::bigint() } else { SqlType::int() };
        AggregateTyping { sql_type: Some(sql_type), is_nullable: Some(false) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_not_nullable() {
        let typing = CountImpl::COUNT.infer_type(&AggregateOperand::of(SqlType::nvarchar(10), true));
        assert_eq!(typing.sql_type, Some(SqlType::int()));
        assert_eq!(typing.is_nullable, Some(false));

        let typing = CountImpl::COUNT_BIG.infer_type(&AggregateOperand::default());
        assert_eq!(typing.sql_type, Some(SqlType::bigint()));
        assert_eq!(typing.is_nullable, Some(false));
    }
}
