//! Turning a [`Policy`] into a rule tree.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::checks::{FieldCheck, FieldRule};
use super::document::{CheckDef, OutcomeDef, Policy, RuleDef};
use super::PolicyError;
use crate::combinators::{Any, Either, Sequence};
use crate::engine::RuleEngine;
use crate::evaluation::RuleEvaluation;
use crate::rule::BoxedRule;

/// A policy compiled into a ready-to-use engine.
#[derive(Debug)]
pub struct CompiledPolicy {
    name: String,
    engine: RuleEngine<Value>,
}

/// Serializable result of evaluating one subject.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyReport {
    /// Name of the evaluated policy
    pub policy: String,

    pub passed: bool,

    /// The failing outcome, rendered as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Value>,

    pub evaluated_at: DateTime<Utc>,
}

impl Policy {
    /// Build the rule tree. Dependency errors surface here.
    pub fn compile(&self) -> Result<CompiledPolicy, PolicyError> {
        let rules = compile_rules(&self.rules)?;
        let engine = RuleEngine::new(rules)?;
        tracing::debug!(policy = %self.name, rules = ?engine.rule_names(), "Policy compiled");

        Ok(CompiledPolicy {
            name: self.name.clone(),
            engine,
        })
    }
}

impl CompiledPolicy {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &RuleEngine<Value> {
        &self.engine
    }

    pub fn evaluate(&self, subject: &Value) -> RuleEvaluation {
        self.engine.evaluate(subject)
    }

    /// Evaluate and wrap the result with the policy name and a timestamp.
    pub fn report(&self, subject: &Value) -> PolicyReport {
        let evaluation = self.evaluate(subject);
        PolicyReport {
            policy: self.name.clone(),
            passed: evaluation.is_pass(),
            outcome: evaluation.outcome().map(|o| o.to_json()),
            evaluated_at: Utc::now(),
        }
    }

    /// Top-level rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.engine.rule_names()
    }
}

fn compile_rules(defs: &[RuleDef]) -> Result<Vec<BoxedRule<Value>>, PolicyError> {
    defs.iter().map(compile_rule).collect()
}

fn compile_rule(def: &RuleDef) -> Result<BoxedRule<Value>, PolicyError> {
    let dependencies = def.depends_on.clone();

    let rule: BoxedRule<Value> = match &def.check {
        CheckDef::Sequence { rules } => Box::new(
            Sequence::new(def.name.clone(), compile_rules(rules)?)?.with_dependencies(dependencies),
        ),
        CheckDef::Any { rules } => Box::new(
            Any::new(def.name.clone(), compile_rules(rules)?)?.with_dependencies(dependencies),
        ),
        CheckDef::Either { left, right } => Box::new(
            Either::new(def.name.clone(), compile_rule(left)?, compile_rule(right)?)
                .with_dependencies(dependencies),
        ),
        CheckDef::Required { field } => Box::new(FieldRule::new(
            def.name.clone(),
            dependencies,
            field.clone(),
            FieldCheck::Required,
            on_fail(def, field),
        )),
        CheckDef::Equals { field, value } => Box::new(FieldRule::new(
            def.name.clone(),
            dependencies,
            field.clone(),
            FieldCheck::Equals(value.clone()),
            on_fail(def, field),
        )),
        CheckDef::OneOf { field, values } => Box::new(FieldRule::new(
            def.name.clone(),
            dependencies,
            field.clone(),
            FieldCheck::OneOf(values.clone()),
            on_fail(def, field),
        )),
        CheckDef::ForbidPattern {
            field,
            pattern,
            preset,
        } => {
            let check = match (pattern, preset) {
                (Some(pattern), None) => {
                    FieldCheck::ForbidRegex(Regex::new(pattern).map_err(|source| {
                        PolicyError::InvalidPattern {
                            rule: def.name.clone(),
                            source,
                        }
                    })?)
                }
                (None, Some(preset)) => FieldCheck::ForbidPreset(*preset),
                _ => {
                    return Err(PolicyError::InvalidCheck {
                        rule: def.name.clone(),
                        reason: "forbid_pattern needs exactly one of 'pattern' or 'preset'"
                            .to_string(),
                    })
                }
            };
            Box::new(FieldRule::new(
                def.name.clone(),
                dependencies,
                field.clone(),
                check,
                on_fail(def, field),
            ))
        }
    };

    Ok(rule)
}

/// The declared outcome, or the default for the check type.
fn on_fail(def: &RuleDef, field: &str) -> OutcomeDef {
    if let Some(outcome) = &def.on_fail {
        return outcome.clone();
    }

    match def.check {
        CheckDef::Required { .. } => OutcomeDef::Incomplete {
            missing: field.to_string(),
            message: format!("Missing required field '{}'", field),
            sources: Vec::new(),
        },
        _ => OutcomeDef::Blocked {
            reason: def.name.clone(),
            message: format!("Rule '{}' rejected field '{}'", def.name, field),
            sources: Vec::new(),
        },
    }
}
