//! The top-level facade.

use crate::combinators::Sequence;
use crate::error::EngineResult;
use crate::evaluation::RuleEvaluation;
use crate::rule::{BoxedRule, Rule};

/// Name of the implicit top-level sequence.
pub const ENGINE_SEQUENCE_NAME: &str = "rule_engine";

/// Wraps a set of top-level rules in one [`Sequence`] and evaluates subjects
/// against it.
///
/// Building the engine is the fail-fast configuration step: unknown
/// dependencies, duplicate names and cycles surface here, before any subject
/// is evaluated.
#[derive(Debug)]
pub struct RuleEngine<S: ?Sized> {
    rules: Sequence<S>,
}

impl<S: ?Sized> RuleEngine<S> {
    pub fn new(rules: Vec<BoxedRule<S>>) -> EngineResult<Self> {
        let rules = Sequence::new(ENGINE_SEQUENCE_NAME, rules)?;
        tracing::debug!(rules = rules.rules().len(), "Rule engine assembled");
        Ok(Self { rules })
    }

    /// Build an engine from any iterator of boxed rules.
    pub fn from_rules<I>(rules: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = BoxedRule<S>>,
    {
        Self::new(rules.into_iter().collect())
    }

    /// Evaluate a subject. Returns the first failure, or pass.
    pub fn evaluate(&self, subject: &S) -> RuleEvaluation {
        self.rules.check(subject)
    }

    /// Top-level rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.rules().iter().map(|r| r.name()).collect()
    }

    pub fn rules(&self) -> &[BoxedRule<S>] {
        self.rules.rules()
    }
}
