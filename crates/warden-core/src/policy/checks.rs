//! Leaf checks over JSON subjects.

use regex::Regex;
use serde_json::Value;

use super::patterns::PatternPreset;
use crate::evaluation::RuleEvaluation;
use crate::evidence::Source;
use crate::rule::Rule;

use super::document::OutcomeDef;

/// Look up a dotted path (`action.args.0.path`) in a JSON value.
///
/// Numeric segments index into arrays. An empty path is the value itself.
pub fn lookup<'a>(subject: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(subject);
    }

    path.split('.').try_fold(subject, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// A compiled field check.
#[derive(Debug)]
pub enum FieldCheck {
    Required,
    Equals(Value),
    OneOf(Vec<Value>),
    ForbidRegex(Regex),
    ForbidPreset(PatternPreset),
}

impl FieldCheck {
    /// `None` when the value satisfies the check, otherwise evidence describing
    /// what was found (if anything worth quoting).
    fn violation(&self, field: &str, value: Option<&Value>) -> Option<Option<Source>> {
        match self {
            FieldCheck::Required => match value {
                None | Some(Value::Null) => Some(None),
                Some(_) => None,
            },
            FieldCheck::Equals(expected) => match value {
                Some(actual) if actual == expected => None,
                actual => Some(actual.map(|v| Source::from_subject("Actual value", field, v.to_string()))),
            },
            FieldCheck::OneOf(allowed) => match value {
                Some(actual) if allowed.contains(actual) => None,
                actual => Some(actual.map(|v| Source::from_subject("Actual value", field, v.to_string()))),
            },
            FieldCheck::ForbidRegex(pattern) => {
                let text = value.and_then(Value::as_str)?;
                pattern.find(text).map(|m| {
                    Some(Source::from_subject(
                        "Forbidden pattern",
                        &format!("{}[{}:{}]", field, m.start(), m.end()),
                        m.as_str(),
                    ))
                })
            }
            FieldCheck::ForbidPreset(preset) => {
                let text = value.and_then(Value::as_str)?;
                preset.find(text).map(|m| {
                    Some(Source::from_subject(
                        m.label,
                        &format!("{}[{}:{}]", field, m.start, m.end),
                        &text[m.start..m.end],
                    ))
                })
            }
        }
    }
}

/// A leaf rule checking one field of a JSON subject.
#[derive(Debug)]
pub struct FieldRule {
    name: String,
    dependencies: Vec<String>,
    field: String,
    check: FieldCheck,
    on_fail: OutcomeDef,
}

impl FieldRule {
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<String>,
        field: impl Into<String>,
        check: FieldCheck,
        on_fail: OutcomeDef,
    ) -> Self {
        Self {
            name: name.into(),
            dependencies,
            field: field.into(),
            check,
            on_fail,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Rule<Value> for FieldRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn check(&self, subject: &Value) -> RuleEvaluation {
        let value = lookup(subject, &self.field);
        match self.check.violation(&self.field, value) {
            None => RuleEvaluation::pass(),
            Some(evidence) => {
                tracing::trace!(rule = %self.name, field = %self.field, "Field check failed");
                RuleEvaluation::respond_shared(self.on_fail.build(evidence))
            }
        }
    }
}
