//! Declarative policies.
//!
//! A policy is a YAML or JSON document listing named rules over a JSON
//! subject. Documents are validated against an embedded JSON Schema, then
//! compiled into a [`RuleEngine`](crate::RuleEngine) made of field checks
//! and combinators.

mod checks;
mod compile;
mod document;
mod patterns;
mod schema;

pub use checks::{lookup, FieldCheck, FieldRule};
pub use compile::{CompiledPolicy, PolicyReport};
pub use document::{CheckDef, OutcomeDef, Policy, RuleDef};
pub use patterns::{PatternMatch, PatternPreset};
pub use schema::validate_policy_schema;

use thiserror::Error;

use crate::error::EngineError;

/// Errors that can occur when loading or compiling a policy.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Policy schema validation failed: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid check in rule '{rule}': {reason}")]
    InvalidCheck { rule: String, reason: String },

    #[error("Invalid pattern in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported policy file extension: '{0}'")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
