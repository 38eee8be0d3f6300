//! Failure payloads carried by a failing [`RuleEvaluation`](crate::RuleEvaluation).
//!
//! The engine never looks inside an outcome. It only propagates whichever
//! outcome the failing rule produced. The four stock outcomes cover the
//! usual guardrail answers; domains can add their own by implementing
//! [`Outcome`].

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::evidence::{Source, SourceMap};

/// Status discriminator rendered as the `status` key of an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// The action must not proceed.
    Blocked,
    /// The request is already satisfied; nothing further to do.
    Complete,
    /// Something went wrong and needs a resolution.
    Error,
    /// Required information is missing.
    Incomplete,
    /// Domain-defined status.
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Blocked => "blocked",
            Status::Complete => "complete",
            Status::Error => "error",
            Status::Incomplete => "incomplete",
            Status::Other(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An opaque failure payload.
///
/// Implementations must be immutable once wrapped in an evaluation; the same
/// outcome may be handed to many callers.
pub trait Outcome: fmt::Debug + Send + Sync {
    /// The status discriminator.
    fn status(&self) -> Status;

    /// Evidence backing this outcome.
    fn sources(&self) -> &SourceMap;

    /// Status-specific fields, rendered next to `status` and `sources`.
    fn fields(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Render as `{"status": ..., "sources": [...], <fields>}`.
    fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("status".to_string(), Value::String(self.status().to_string()));
        object.insert(
            "sources".to_string(),
            serde_json::to_value(self.sources()).unwrap_or_else(|_| Value::Array(Vec::new())),
        );
        object.extend(self.fields());
        Value::Object(object)
    }
}

impl Serialize for dyn Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

macro_rules! impl_source_builders {
    ($ty:ty) => {
        impl $ty {
            /// Attach evidence, keeping insertion order.
            pub fn with_sources<I>(mut self, sources: I) -> Self
            where
                I: IntoIterator<Item = Source>,
            {
                self.sources.add(sources);
                self
            }

            pub fn sources_mut(&mut self) -> &mut SourceMap {
                &mut self.sources
            }
        }
    };
}

/// The subject must not proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedOutcome {
    /// Machine-readable reason (e.g., "insufficient_permissions")
    pub reason: String,
    pub message: String,
    sources: SourceMap,
}

impl BlockedOutcome {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            message: message.into(),
            sources: SourceMap::new(),
        }
    }
}

impl_source_builders!(BlockedOutcome);

impl Outcome for BlockedOutcome {
    fn status(&self) -> Status {
        Status::Blocked
    }

    fn sources(&self) -> &SourceMap {
        &self.sources
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("reason".to_string(), Value::String(self.reason.clone()));
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        fields
    }
}

/// Nothing left to do; the answer is already known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteOutcome {
    pub message: String,
    sources: SourceMap,
}

impl CompleteOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sources: SourceMap::new(),
        }
    }
}

impl_source_builders!(CompleteOutcome);

impl Outcome for CompleteOutcome {
    fn status(&self) -> Status {
        Status::Complete
    }

    fn sources(&self) -> &SourceMap {
        &self.sources
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        fields
    }
}

/// An error the caller can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorOutcome {
    pub message: String,
    /// What the caller should do about it
    pub resolution: String,
    sources: SourceMap,
}

impl ErrorOutcome {
    pub fn new(message: impl Into<String>, resolution: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resolution: resolution.into(),
            sources: SourceMap::new(),
        }
    }
}

impl_source_builders!(ErrorOutcome);

impl Outcome for ErrorOutcome {
    fn status(&self) -> Status {
        Status::Error
    }

    fn sources(&self) -> &SourceMap {
        &self.sources
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        fields.insert(
            "resolution".to_string(),
            Value::String(self.resolution.clone()),
        );
        fields
    }
}

/// Required information is missing from the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteOutcome {
    /// The missing field
    pub missing: String,
    pub message: String,
    sources: SourceMap,
}

impl IncompleteOutcome {
    pub fn new(missing: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            missing: missing.into(),
            message: message.into(),
            sources: SourceMap::new(),
        }
    }
}

impl_source_builders!(IncompleteOutcome);

impl Outcome for IncompleteOutcome {
    fn status(&self) -> Status {
        Status::Incomplete
    }

    fn sources(&self) -> &SourceMap {
        &self.sources
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("missing".to_string(), Value::String(self.missing.clone()));
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        fields
    }
}
