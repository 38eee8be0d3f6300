//! First-success composition over an ordered list of rules.

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::evaluation::RuleEvaluation;
use crate::rule::{BoxedRule, Rule};

use super::collect_names;

/// OR-composition: the first passing child wins.
///
/// Children are evaluated strictly in the order given; they are not
/// dependency-resolved. When no child passes, the first child's evaluation is
/// returned so the caller sees the primary diagnostic.
pub struct Any<S: ?Sized> {
    name: String,
    rules: Vec<BoxedRule<S>>,
    dependencies: Vec<String>,
}

impl<S: ?Sized> Any<S> {
    /// # Errors
    /// [`EngineError::EmptyAny`] when `rules` is empty.
    pub fn new(name: impl Into<String>, rules: Vec<BoxedRule<S>>) -> EngineResult<Self> {
        let name = name.into();
        if rules.is_empty() {
            return Err(EngineError::EmptyAny { name });
        }

        Ok(Self {
            name,
            rules,
            dependencies: Vec::new(),
        })
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

    pub fn rules(&self) -> &[BoxedRule<S>] {
        &self.rules
    }
}

impl<S: ?Sized> Rule<S> for Any<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, subject: &S) -> RuleEvaluation {
        let mut first_failure: Option<RuleEvaluation> = None;

        for rule in &self.rules {
            let evaluation = rule.check(subject);
            if evaluation.is_pass() {
                tracing::trace!(any = %self.name, rule = %rule.name(), "Rule passed");
                return evaluation;
            }
            first_failure.get_or_insert(evaluation);
        }

        // Non-empty by construction, so a failure was recorded.
        first_failure.unwrap_or_else(RuleEvaluation::pass)
    }
}

impl<S: ?Sized> fmt::Debug for Any<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any")
            .field("name", &self.name)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
