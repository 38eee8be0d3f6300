//! A primary rule with a single fallback.

use std::fmt;

use crate::evaluation::RuleEvaluation;
use crate::rule::{BoxedRule, Rule};

use super::collect_names;

/// Binary OR: a primary rule with one fallback.
///
/// If both sides fail the left evaluation is returned, so callers reasoning
/// about recovery see the primary path's diagnostic.
pub struct Either<S: ?Sized> {
    name: String,
    left: BoxedRule<S>,
    right: BoxedRule<S>,
    dependencies: Vec<String>,
}

impl<S: ?Sized> Either<S> {
    pub fn new(name: impl Into<String>, left: BoxedRule<S>, right: BoxedRule<S>) -> Self {
        Self {
            name: name.into(),
            left,
            right,
            dependencies: Vec::new(),
        }
    }

    /// Declare the sibling rules this combinator must run after.
    pub fn with_dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.dependencies = collect_names(dependencies);
        self
    }

    pub fn left(&self) -> &dyn Rule<S> {
        self.left.as_ref()
    }

    pub fn right(&self) -> &dyn Rule<S> {
        self.right.as_ref()
    }
}

impl<S: ?Sized> Rule<S> for Either<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, subject: &S) -> RuleEvaluation {
        let left = self.left.check(subject);
        if left.is_pass() {
            return left;
        }

        let right = self.right.check(subject);
        if right.is_pass() {
            tracing::trace!(either = %self.name, rule = %self.right.name(), "Fallback rule passed");
            return right;
        }

        left
    }
}

impl<S: ?Sized> fmt::Debug for Either<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Either")
            .field("name", &self.name)
            .field("left", &self.left.name())
            .field("right", &self.right.name())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{blocked, count, passing, Probe};

    #[test]
    fn test_identity() {
        let either = Either::new("test-either", passing("l", &[]), passing("r", &[]))
            .with_dependencies(["dep1"]);

        assert_eq!(either.name(), "test-either");
        assert_eq!(either.dependencies(), &["dep1".to_string()]);
        assert_eq!(either.left().name(), "l");
        assert_eq!(either.right().name(), "r");
    }

    #[test]
    fn test_left_pass_skips_right() {
        let left = Probe::new("left", RuleEvaluation::pass());
        let right = Probe::new("right", blocked("right"));
        let right_calls = right.calls();

        let either = Either::new("e", left.boxed(), right.boxed());
        assert!(either.check("subject").is_pass());
        assert_eq!(count(&right_calls), 0);
    }

    #[test]
    fn test_right_pass_when_left_fails() {
        let left = Probe::new("left", blocked("left"));
        let right = Probe::new("right", RuleEvaluation::pass());
        let right_calls = right.calls();

        let either = Either::new("e", left.boxed(), right.boxed());
        assert!(either.check("subject").is_pass());
        assert_eq!(count(&right_calls), 1);
    }

    #[test]
    fn test_left_failure_returned_when_both_fail() {
        let left_failure = blocked("left");
        let right_failure = blocked("right");
        let either = Either::new(
            "e",
            Probe::new("left", left_failure.clone()).boxed(),
            Probe::new("right", right_failure.clone()).boxed(),
        );

        let result = either.check("subject");
        assert!(result.same_as(&left_failure));
        assert!(!result.same_as(&right_failure));
    }
}
