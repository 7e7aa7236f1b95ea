use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
};

use crate::{
    analyzer::{AnalyzerError, ProcedureSemanticModelBuilder},
    ast::Routine,
    catalog::TypeCatalog,
    config::AnalyzerConfig,
    model::RoutineModel,
};

/// One routine handed to the analyzer. `ast` is `None` when the upstream parser gave up.
#[derive(Debug, Clone)]
pub struct RoutineInput {
    pub name: String,
    pub ast: Option<Routine>,
}

impl RoutineInput {
    pub fn parsed(routine: Routine) -> Self {
        Self { name: routine.name.to_string(), ast: Some(routine) }
    }

    pub fn unparsed(name: &str) -> Self {
        Self { name: name.to_string(), ast: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutineOutcome {
    Analyzed(RoutineModel),
    /// No AST; carries an empty model so callers can still emit a placeholder.
    Unparseable(RoutineModel),
    Failed { error: AnalyzerError },
}

impl RoutineOutcome {
    pub fn model(&self) -> Option<&RoutineModel> {
        match self {
            RoutineOutcome::Analyzed(model) | RoutineOutcome::Unparseable(model) => Some(model),
            RoutineOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineAnalysis {
    pub name: String,
    pub outcome: RoutineOutcome,
}

/// Entry point for analyzing routines against one catalog.
///
/// Every routine gets its own builder, so routines share nothing but the catalog and the
/// configuration. A failure (or a panic) in one routine never affects another.
pub struct RoutineAnalyzer {
    catalog: Arc<TypeCatalog>,
    config: AnalyzerConfig,
}

impl RoutineAnalyzer {
    pub fn new(catalog: Arc<TypeCatalog>, config: AnalyzerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, input: &RoutineInput) -> RoutineAnalysis {
        let outcome = match &input.ast {
            None => {
                tracing::warn!(routine = %input.name, "routine has no AST, emitting an empty model");
                RoutineOutcome::Unparseable(RoutineModel::default())
            }
            Some(routine) => match self.build(routine) {
                Ok(model) => RoutineOutcome::Analyzed(model),
                Err(error) => {
                    tracing::warn!(routine = %input.name, %error, "routine analysis failed");
                    RoutineOutcome::Failed { error }
                }
            },
        };
        RoutineAnalysis { name: input.name.clone(), outcome }
    }

    /// Analyzes `inputs` on a bounded set of worker threads. Results come back in input order.
    pub fn analyze_batch(&self, inputs: &[RoutineInput]) -> Vec<RoutineAnalysis> {
        let workers = self.workers().min(inputs.len());
        if workers <= 1 {
            return inputs.iter().map(|input| self.analyze(input)).collect();
        }

        let chunk_size = inputs.len().div_ceil(workers);
        tracing::debug!(routines = inputs.len(), workers, "analyzing batch");

        thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .chunks(chunk_size)
                .map(|chunk| (chunk, scope.spawn(move || chunk.iter().map(|input| self.analyze(input)).collect::<Vec<_>>())))
                .collect();

            handles
                .into_iter()
                .flat_map(|(chunk, handle)| match handle.join() {
                    Ok(analyses) => analyses,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        tracing::error!(%message, "analysis worker died");
                        chunk
                            .iter()
                            .map(|input| RoutineAnalysis {
                                name: input.name.clone(),
                                outcome: RoutineOutcome::Failed { error: AnalyzerError::Internal(message.clone()) },
                            })
                            .collect()
                    }
                })
                .collect()
        })
    }

    fn build(&self, routine: &Routine) -> Result<RoutineModel, AnalyzerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| ProcedureSemanticModelBuilder::build(&self.catalog, &self.config, routine))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(AnalyzerError::Internal(panic_message(payload.as_ref()))),
        }
    }

    fn workers(&self) -> usize {
        match self.config.parallelism {
            0 => thread::available_parallelism().map(|p| p.get()).unwrap_or(4).clamp(1, 64),
            n => n,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analysis panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::_tests::fixtures::{catalog, col, procedure, select_from},
        ast::{Statement, TableSource},
    };

    fn analyzer(config: AnalyzerConfig) -> RoutineAnalyzer {
        RoutineAnalyzer::new(Arc::new(catalog(&config)), config)
    }

    fn orders_procedure(name: &str) -> RoutineInput {
        let query = select_from(vec![col("Id")], TableSource::named("dbo.Orders", None)).into_query();
        let mut routine = procedure(vec![Statement::Select(query)]);
        routine.name = name.into();
        RoutineInput::parsed(routine)
    }

    fn nested_procedure(name: &str) -> RoutineInput {
        let inner = select_from(vec![col("Id")], TableSource::named("dbo.Orders", None)).into_query();
        let derived = TableSource::Derived { query: Box::new(inner), alias: "d".into(), columns: vec![] };
        let mut routine = procedure(vec![Statement::Select(select_from(vec![col("Id")], derived).into_query())]);
        routine.name = name.into();
        RoutineInput::parsed(routine)
    }

    #[test]
    fn test_missing_ast_yields_empty_placeholder() {
        let analysis = analyzer(AnalyzerConfig::default()).analyze(&RoutineInput::unparsed("dbo.usp_Broken"));

        assert_eq!(analysis.name, "dbo.usp_Broken");
        assert_eq!(analysis.outcome, RoutineOutcome::Unparseable(RoutineModel::default()));
        assert_eq!(analysis.outcome.model(), Some(&RoutineModel::default()));
    }

    #[test]
    fn test_failure_is_isolated_to_its_routine() {
        let config = AnalyzerConfig { max_nesting_depth: 1, ..AnalyzerConfig::default() };
        let analyses = analyzer(config).analyze_batch(&[nested_procedure("dbo.usp_Deep"), orders_procedure("dbo.usp_Flat")]);

        assert_eq!(analyses[0].outcome, RoutineOutcome::Failed { error: AnalyzerError::NestingTooDeep { depth: 1 } });
        assert!(analyses[0].outcome.model().is_none());
        let model = analyses[1].outcome.model().unwrap();
        assert_eq!(model.result_sets.len(), 1);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let inputs: Vec<_> = (0..7)
            .map(|i| match i % 3 {
                0 => RoutineInput::unparsed(&format!("dbo.usp_{i}")),
                _ => orders_procedure(&format!("dbo.usp_{i}")),
            })
            .collect();

        let analyses = analyzer(AnalyzerConfig::default().with_parallelism(2)).analyze_batch(&inputs);

        let names: Vec<_> = analyses.iter().map(|analysis| analysis.name.clone()).collect();
        let expected: Vec<_> = (0..7).map(|i| format!("dbo.usp_{i}")).collect();
        assert_eq!(names, expected);
        assert!(matches!(analyses[3].outcome, RoutineOutcome::Unparseable(_)));
        assert!(matches!(analyses[4].outcome, RoutineOutcome::Analyzed(_)));
    }

    #[test]
    fn test_batch_matches_sequential_analysis() {
        let inputs = vec![orders_procedure("dbo.a"), orders_procedure("dbo.b"), orders_procedure("dbo.c")];
        let sequential = analyzer(AnalyzerConfig::default().with_parallelism(1)).analyze_batch(&inputs);
        let parallel = analyzer(AnalyzerConfig::default().with_parallelism(3)).analyze_batch(&inputs);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_panic_payload_message() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 1");
    }
}
