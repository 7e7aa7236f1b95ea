use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;

use crate::rules::{AggregateImpl, AggregateOperand, AggregateTyping, AvgImpl, CountImpl, MaxImpl, MinImpl, StatisticalImpl, SumImpl};

static SHARED: Lazy<AggregateRegistry> = Lazy::new(AggregateRegistry::default_aggregate_registry);

/// Case-insensitive registry of aggregates.
#[derive(Default)]
pub struct AggregateRegistry {
    by_name: HashMap<String, Arc<dyn AggregateImpl>>,
}

impl AggregateRegistry {
    pub fn new() -> Self { Self { by_name: HashMap::new() } }

    pub fn register<I: AggregateImpl + 'static>(&mut self, impl_: I) {
        self.by_name.insert(impl_.name().to_string(), Arc::new(impl_));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AggregateImpl>> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn is_aggregate(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_ascii_lowercase())
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn infer_type(&self, name: &str, operand: &AggregateOperand) -> Option<AggregateTyping> {
        self.get(name).map(|imp| imp.infer_type(operand))
    }

    pub fn default_aggregate_registry() -> Self {
        let mut registry = Self::new();
        registry.register(CountImpl::COUNT);
        registry.register(CountImpl::COUNT_BIG);
        registry.register(SumImpl);
        registry.register(AvgImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        for name in ["stdev", "stdevp", "var", "varp"] {
            registry.register(StatisticalImpl(name));
        }
        registry
    }

    /// Process-wide default registry.
    pub fn shared() -> &'static AggregateRegistry {
        &SHARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqlType;

    #[test]
    fn registry_contains_all_and_lookup_is_case_insensitive() {
        let registry = AggregateRegistry::default_aggregate_registry();
        assert_eq!(
            registry.list(),
            vec!["avg", "count", "count_big", "max", "min", "stdev", "stdevp", "sum", "var", "varp"]
        );
        assert!(registry.is_aggregate("SUM"));
        assert!(registry.get("Count_Big").is_some());
        assert!(!registry.is_aggregate("upper"));
    }

    #[test]
    fn shared_registry_routes_typing() {
        let typing = AggregateRegistry::shared()
            .infer_type("Sum", &AggregateOperand::of(SqlType::int(), false))
            .unwrap();
        assert_eq!(typing, AggregateTyping::nullable(SqlType::int()));
        assert!(AggregateRegistry::shared().infer_type("median", &AggregateOperand::default()).is_none());
    }
}
