//! Structural errors raised while assembling a rule tree.
//!
//! These never describe a subject. A subject that violates a rule yields a
//! failing [`RuleEvaluation`](crate::RuleEvaluation), not an error.

use thiserror::Error;

/// Errors raised when combinators or the engine are constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Rule '{rule}' depends on unknown rule '{dependency}'")]
    UnknownDependency { rule: String, dependency: String },

    #[error("Cyclic dependency detected among rules: {}", .rules.join(", "))]
    CyclicDependency {
        /// Rules that could not be ordered, in input order.
        rules: Vec<String>,
    },

    #[error("Duplicate rule name: {name}")]
    DuplicateRule { name: String },

    #[error("Any rule engine must have at least one rule to evaluate")]
    EmptyAny {
        /// Name of the offending `Any` combinator.
        name: String,
    },
}

/// Result alias for rule tree assembly.
pub type EngineResult<T> = Result<T, EngineError>;
