//! # warden-core
//!
//! Deterministic rule composition engine for guardrail policies.
//!
//! Warden decides whether a subject (a proposed agent action, a request, a
//! document) may proceed. It answers with a pass, or with the outcome of the
//! first rule that rejected the subject: blocked, incomplete, error, or
//! complete.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: rule order is resolved once, with a stable tie-break
//! 2. **Fail-fast assembly**: unknown dependencies, duplicate names and cycles
//!    are rejected when the rule tree is built, never during evaluation
//! 3. **Failures are values**: a rejected subject is a [`RuleEvaluation::Fail`],
//!    carrying the failing rule's outcome unchanged
//! 4. **Shareable**: rule trees are immutable and `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use warden_core::{BlockedOutcome, FnRule, RuleEngine, RuleEvaluation};
//!
//! let engine = RuleEngine::new(vec![
//!     FnRule::new("not_empty", |s: &str| {
//!         if s.is_empty() {
//!             RuleEvaluation::respond(BlockedOutcome::new("empty", "Nothing to do"))
//!         } else {
//!             RuleEvaluation::pass()
//!         }
//!     })
//!     .boxed(),
//!     FnRule::new("no_shell", |s: &str| {
//!         if s.contains("rm -rf") {
//!             RuleEvaluation::respond(BlockedOutcome::new("destructive", "Refusing"))
//!         } else {
//!             RuleEvaluation::pass()
//!         }
//!     })
//!     .with_dependencies(["not_empty"])
//!     .boxed(),
//! ])
//! .unwrap();
//!
//! assert!(engine.evaluate("ls -la").is_pass());
//! assert!(!engine.evaluate("rm -rf /").is_pass());
//! ```

pub mod combinators;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod evidence;
pub mod outcome;
pub mod policy;
pub mod resolver;
pub mod rule;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

// Re-export main types at crate root
pub use combinators::{Any, Either, Sequence};
pub use engine::RuleEngine;
pub use error::{EngineError, EngineResult};
pub use evaluation::RuleEvaluation;
pub use evidence::{Source, SourceMap};
pub use outcome::{
    BlockedOutcome, CompleteOutcome, ErrorOutcome, IncompleteOutcome, Outcome, Status,
};
pub use policy::{CompiledPolicy, Policy, PolicyError, PolicyReport};
pub use rule::{BoxedRule, FnRule, Rule};
