//! The two-state result of checking a rule.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::outcome::Outcome;

/// Result of checking one rule against a subject.
///
/// A failing evaluation shares its outcome through an `Arc`, so the outcome a
/// leaf rule produced is the very same object the engine hands back, however
/// deeply the leaf was nested.
#[derive(Debug, Clone)]
pub enum RuleEvaluation {
    Pass,
    Fail(Arc<dyn Outcome>),
}

impl RuleEvaluation {
    pub fn pass() -> Self {
        RuleEvaluation::Pass
    }

    /// Fail with the given outcome.
    pub fn respond(outcome: impl Outcome + 'static) -> Self {
        RuleEvaluation::Fail(Arc::new(outcome))
    }

    /// Fail with an outcome that is already shared.
    pub fn respond_shared(outcome: Arc<dyn Outcome>) -> Self {
        RuleEvaluation::Fail(outcome)
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, RuleEvaluation::Pass)
    }

    /// The failure payload, if any.
    pub fn outcome(&self) -> Option<&Arc<dyn Outcome>> {
        match self {
            RuleEvaluation::Pass => None,
            RuleEvaluation::Fail(outcome) => Some(outcome),
        }
    }

    /// True when both evaluations pass, or both fail with the same outcome object.
    pub fn same_as(&self, other: &RuleEvaluation) -> bool {
        match (self, other) {
            (RuleEvaluation::Pass, RuleEvaluation::Pass) => true,
            (RuleEvaluation::Fail(a), RuleEvaluation::Fail(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RuleEvaluation::Pass => json!({ "status": "pass" }),
            RuleEvaluation::Fail(outcome) => outcome.to_json(),
        }
    }
}

impl Serialize for RuleEvaluation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
