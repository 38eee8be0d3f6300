//! The rule capability.

use std::fmt;

use crate::evaluation::RuleEvaluation;

/// A named check over a subject of type `S`.
///
/// # Contract
/// - `name` is non-empty and stable; it identifies the rule among its siblings
/// - `dependencies` names sibling rules that must be evaluated first
/// - `check` is deterministic and must not mutate shared state; policy
///   failures are returned as [`RuleEvaluation::Fail`], never raised
///
/// Rules are `Send + Sync` so a constructed rule tree can be shared between
/// threads evaluating different subjects.
pub trait Rule<S: ?Sized>: Send + Sync {
    fn name(&self) -> &str;

    fn dependencies(&self) -> &[String];

    fn check(&self, subject: &S) -> RuleEvaluation;
}

/// An owned, type-erased rule.
pub type BoxedRule<S> = Box<dyn Rule<S>>;

impl<S: ?Sized, R: Rule<S> + ?Sized> Rule<S> for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dependencies(&self) -> &[String] {
        (**self).dependencies()
    }

    fn check(&self, subject: &S) -> RuleEvaluation {
        (**self).check(subject)
    }
}

/// A leaf rule backed by a closure.
pub struct FnRule<S: ?Sized> {
    name: String,
    dependencies: Vec<String>,
    check: Box<dyn Fn(&S) -> RuleEvaluation + Send + Sync>,
}

impl<S: ?Sized> FnRule<S> {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&S) -> RuleEvaluation + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            check: Box::new(check),
        }
    }

    /// Declare the sibling rules this rule must run after.
    pub fn with_dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Box the rule for use in a combinator.
    pub fn boxed(self) -> BoxedRule<S>
    where
        S: 'static,
    {
        Box::new(self)
    }
}

impl<S: ?Sized> Rule<S> for FnRule<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, subject: &S) -> RuleEvaluation {
        (self.check)(subject)
    }
}

impl<S: ?Sized> fmt::Debug for FnRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}
