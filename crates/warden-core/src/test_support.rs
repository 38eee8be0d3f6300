use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::evaluation::RuleEvaluation;
use crate::outcome::BlockedOutcome;
use crate::rule::{BoxedRule, FnRule, Rule};

pub fn passing(name: &str, deps: &[&str]) -> BoxedRule<str> {
    FnRule::new(name, |_: &str| RuleEvaluation::pass())
        .with_dependencies(deps.iter().copied())
        .boxed()
}

pub fn names<S: ?Sized>(rules: &[BoxedRule<S>]) -> Vec<&str> {
    rules.iter().map(|r| r.name()).collect()
}

/// A rule that returns a fixed evaluation and counts how often it was checked.
pub struct Probe {
    name: String,
    dependencies: Vec<String>,
    result: RuleEvaluation,
    calls: Arc<AtomicUsize>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl Probe {
    pub fn new(name: &str, result: RuleEvaluation) -> Self {
        Self {
            name: name.to_string(),
            dependencies: Vec::new(),
            result,
            calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Record the rule name into `log` every time it is checked.
    pub fn logging_to(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn boxed(self) -> BoxedRule<str> {
        Box::new(self)
    }
}

impl Rule<str> for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, _subject: &str) -> RuleEvaluation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
        self.result.clone()
    }
}

pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}

pub fn blocked(reason: &str) -> RuleEvaluation {
    RuleEvaluation::respond(BlockedOutcome::new(reason, "blocked"))
}
