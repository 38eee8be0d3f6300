//! Dependency-ordered AND composition.

use std::fmt;

use crate::error::EngineResult;
use crate::evaluation::RuleEvaluation;
use crate::resolver;
use crate::rule::{BoxedRule, Rule};

use super::collect_names;

/// AND-composition: passes only when every child passes.
///
/// Children are put in dependency order once, at construction. Evaluation
/// stops at the first failing child and returns its evaluation unchanged.
pub struct Sequence<S: ?Sized> {
    name: String,
    rules: Vec<BoxedRule<S>>,
    dependencies: Vec<String>,
}

impl<S: ?Sized> Sequence<S> {
    /// Build a sequence, resolving the dependencies between `rules`.
    ///
    /// # Errors
    /// Any [`EngineError`](crate::EngineError) raised by the resolver:
    /// unknown dependency, duplicate name, or cycle.
    pub fn new(name: impl Into<String>, rules: Vec<BoxedRule<S>>) -> EngineResult<Self> {
        let name = name.into();
        let rules = resolver::resolve(rules)?;
        tracing::debug!(sequence = %name, rules = rules.len(), "Sequence assembled");

        Ok(Self {
            name,
            rules,
            dependencies: Vec::new(),
        })
    }

    /// Declare the sibling rules this sequence must run after.
    pub fn with_dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.dependencies = collect_names(dependencies);
        self
    }

    /// Children in evaluation order.
    pub fn rules(&self) -> &[BoxedRule<S>] {
        &self.rules
    }
}

impl<S: ?Sized> Rule<S> for Sequence<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, subject: &S) -> RuleEvaluation {
        for rule in &self.rules {
            let evaluation = rule.check(subject);
            if !evaluation.is_pass() {
                tracing::trace!(sequence = %self.name, rule = %rule.name(), "Rule failed, stopping sequence");
                return evaluation;
            }
        }

        RuleEvaluation::pass()
    }
}

impl<S: ?Sized> fmt::Debug for Sequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::test_support::{blocked, count, names, passing, Probe};

    #[test]
    fn test_identity() {
        let sequence = Sequence::new("test-sequence", vec![passing("rule1", &[])])
            .unwrap()
            .with_dependencies(["dep1", "dep2"]);

        assert_eq!(sequence.name(), "test-sequence");
        assert_eq!(sequence.dependencies(), &["dep1".to_string(), "dep2".to_string()]);
    }

    #[test]
    fn test_children_are_resolved() {
        let sequence = Sequence::new(
            "s",
            vec![passing("b", &["a"]), passing("a", &[])],
        )
        .unwrap();
        assert_eq!(names(sequence.rules()), vec!["a", "b"]);
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let first = blocked("first");
        let a = Probe::new("a", first.clone());
        let b = Probe::new("b", RuleEvaluation::pass());
        let c = Probe::new("c", RuleEvaluation::pass());
        let (a_calls, b_calls, c_calls) = (a.calls(), b.calls(), c.calls());

        let sequence = Sequence::new("s", vec![a.boxed(), b.boxed(), c.boxed()]).unwrap();
        let result = sequence.check("subject");

        assert!(result.same_as(&first));
        assert_eq!(count(&a_calls), 1);
        assert_eq!(count(&b_calls), 0);
        assert_eq!(count(&c_calls), 0);
    }

    #[test]
    fn test_last_failure_returned() {
        let last = blocked("last");
        let sequence = Sequence::new(
            "s",
            vec![
                Probe::new("a", RuleEvaluation::pass()).boxed(),
                Probe::new("b", RuleEvaluation::pass()).boxed(),
                Probe::new("c", last.clone()).boxed(),
            ],
        )
        .unwrap();

        assert!(sequence.check("subject").same_as(&last));
    }

    #[test]
    fn test_all_pass() {
        let sequence = Sequence::new(
            "s",
            vec![passing("a", &[]), passing("b", &[]), passing("c", &[])],
        )
        .unwrap();
        assert!(sequence.check("subject").is_pass());
    }

    #[test]
    fn test_empty_sequence_passes() {
        let sequence = Sequence::<str>::new("empty", Vec::new()).unwrap();
        assert!(sequence.check("subject").is_pass());
    }

    #[test]
    fn test_resolver_errors_surface() {
        let result = Sequence::new("s", vec![passing("a", &["missing"])]);
        assert!(matches!(
            result,
            Err(EngineError::UnknownDependency { .. })
        ));
    }
}
