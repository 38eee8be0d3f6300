//! Policy documents: parsing from YAML/JSON and structural validation.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patterns::PatternPreset;
use super::schema::validate_policy_schema;
use super::PolicyError;
use crate::evidence::Source;
use crate::outcome::{BlockedOutcome, CompleteOutcome, ErrorOutcome, IncompleteOutcome, Outcome};

/// A declarative guardrail policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    /// Version of this policy document
    pub policy_version: String,

    /// Human-readable name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Top-level rules, evaluated as one sequence
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// One named rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDef {
    /// Unique among its siblings
    pub name: String,

    /// Sibling rules that must be evaluated first
    #[serde(default)]
    pub depends_on: Vec<String>,

    pub check: CheckDef,

    /// Outcome reported when a leaf check fails. Ignored on combinators,
    /// which report their children's outcomes.
    #[serde(default)]
    pub on_fail: Option<OutcomeDef>,
}

/// What a rule checks. Field paths are dotted (`action.args.0.path`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckDef {
    /// Field present and not null
    Required { field: String },

    /// Field equal to `value`
    Equals { field: String, value: Value },

    /// Field equal to one of `values`
    OneOf { field: String, values: Vec<Value> },

    /// String field must not match `pattern` or `preset`
    ForbidPattern {
        field: String,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        preset: Option<PatternPreset>,
    },

    /// Every nested rule must pass
    Sequence { rules: Vec<RuleDef> },

    /// At least one nested rule must pass
    Any { rules: Vec<RuleDef> },

    /// `left` passes, or else `right` does
    Either {
        left: Box<RuleDef>,
        right: Box<RuleDef>,
    },
}

/// A failure outcome, tagged by status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeDef {
    Blocked {
        reason: String,
        message: String,
        #[serde(default)]
        sources: Vec<Source>,
    },
    Complete {
        message: String,
        #[serde(default)]
        sources: Vec<Source>,
    },
    Error {
        message: String,
        resolution: String,
        #[serde(default)]
        sources: Vec<Source>,
    },
    Incomplete {
        missing: String,
        message: String,
        #[serde(default)]
        sources: Vec<Source>,
    },
}

impl OutcomeDef {
    /// Build the outcome, appending `evidence` after the declared sources.
    pub fn build(&self, evidence: Option<Source>) -> Arc<dyn Outcome> {
        match self {
            OutcomeDef::Blocked {
                reason,
                message,
                sources,
            } => Arc::new(
                BlockedOutcome::new(reason.clone(), message.clone())
                    .with_sources(sources.iter().cloned().chain(evidence)),
            ),
            OutcomeDef::Complete { message, sources } => Arc::new(
                CompleteOutcome::new(message.clone())
                    .with_sources(sources.iter().cloned().chain(evidence)),
            ),
            OutcomeDef::Error {
                message,
                resolution,
                sources,
            } => Arc::new(
                ErrorOutcome::new(message.clone(), resolution.clone())
                    .with_sources(sources.iter().cloned().chain(evidence)),
            ),
            OutcomeDef::Incomplete {
                missing,
                message,
                sources,
            } => Arc::new(
                IncompleteOutcome::new(missing.clone(), message.clone())
                    .with_sources(sources.iter().cloned().chain(evidence)),
            ),
        }
    }
}

impl Policy {
    /// Parse a policy from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a policy from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a policy file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(PolicyError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    fn from_value(value: Value) -> Result<Self, PolicyError> {
        validate_policy_schema(&value).map_err(PolicyError::Schema)?;
        let policy: Policy = serde_json::from_value(value)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check the fields the schema cannot express.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.name.trim().is_empty() {
            return Err(PolicyError::MissingField("name".to_string()));
        }

        validate_rules(&self.rules, "rules")
    }
}

fn validate_rules(rules: &[RuleDef], path: &str) -> Result<(), PolicyError> {
    for (index, rule) in rules.iter().enumerate() {
        let here = format!("{}[{}]", path, index);
        if rule.name.trim().is_empty() {
            return Err(PolicyError::MissingField(format!("{}.name", here)));
        }

        match &rule.check {
            CheckDef::Required { field }
            | CheckDef::Equals { field, .. }
            | CheckDef::OneOf { field, .. }
            | CheckDef::ForbidPattern { field, .. } => {
                if field.trim().is_empty() {
                    return Err(PolicyError::MissingField(format!("{}.check.field", here)));
                }
            }
            CheckDef::Sequence { rules } | CheckDef::Any { rules } => {
                validate_rules(rules, &format!("{}.check.rules", here))?;
            }
            CheckDef::Either { left, right } => {
                validate_rules(std::slice::from_ref(left.as_ref()), &format!("{}.check.left", here))?;
                validate_rules(
                    std::slice::from_ref(right.as_ref()),
                    &format!("{}.check.right", here),
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_POLICY: &str = r#"
policy_version: "1.0"
name: "Tool gate"
rules:
  - name: has_tool
    check:
      type: required
      field: action.tool
  - name: no_credentials
    depends_on: [has_tool]
    check:
      type: forbid_pattern
      field: action.input
      preset: credentials
    on_fail:
      status: blocked
      reason: credential_exposure
      message: "Credentials must not be sent to tools"
      sources:
        - name: "Security policy"
          reference: "https://example.com/security"
          content: "Never forward secrets"
"#;

    #[test]
    fn test_parse_valid_policy() {
        let policy = Policy::from_yaml(VALID_POLICY).unwrap();
        assert_eq!(policy.name, "Tool gate");
        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rules[1].depends_on, vec!["has_tool".to_string()]);
        assert!(matches!(
            policy.rules[1].check,
            CheckDef::ForbidPattern {
                preset: Some(PatternPreset::Credentials),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_json_policy() {
        let json = r#"{
            "policy_version": "1.0",
            "name": "Json policy",
            "rules": [
                {"name": "r", "check": {"type": "equals", "field": "a", "value": 1}}
            ]
        }"#;
        let policy = Policy::from_json(json).unwrap();
        assert_eq!(
            policy.rules[0].check,
            CheckDef::Equals {
                field: "a".to_string(),
                value: serde_json::json!(1)
            }
        );
    }

    #[test]
    fn test_missing_name_fails_schema() {
        let yaml = r#"
policy_version: "1.0"
rules: []
"#;
        assert!(matches!(
            Policy::from_yaml(yaml),
            Err(PolicyError::Schema(_))
        ));
    }

    #[test]
    fn test_missing_variant_fields_fail_schema() {
        let yaml = r#"
policy_version: "1.0"
name: "Test"
rules:
  - name: gate
    check:
      type: either
      left:
        name: has_tool
        check: { type: required }
        on_fail: { status: blocked }
"#;
        match Policy::from_yaml(yaml) {
            Err(PolicyError::Schema(errors)) => {
                assert!(errors.iter().any(|e| e.ends_with(" at /rules/0/check")));
                assert!(errors
                    .iter()
                    .any(|e| e.ends_with(" at /rules/0/check/left/check")));
                assert!(errors
                    .iter()
                    .any(|e| e.ends_with(" at /rules/0/check/left/on_fail")));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_blank_rule_name_rejected() {
        let yaml = r#"
policy_version: "1.0"
name: "Test"
rules:
  - name: "  "
    check: { type: required, field: a }
"#;
        match Policy::from_yaml(yaml) {
            Err(PolicyError::MissingField(field)) => assert_eq!(field, "rules[0].name"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_nested_blank_field_rejected() {
        let yaml = r#"
policy_version: "1.0"
name: "Test"
rules:
  - name: outer
    check:
      type: any
      rules:
        - name: inner
          check: { type: required, field: "" }
"#;
        match Policy::from_yaml(yaml) {
            Err(PolicyError::MissingField(field)) => {
                assert_eq!(field, "rules[0].check.rules[0].check.field")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_def_appends_evidence() {
        let def = OutcomeDef::Blocked {
            reason: "r".to_string(),
            message: "m".to_string(),
            sources: vec![Source::new("Docs", "https://docs", "See docs")],
        };
        let outcome = def.build(Some(Source::from_subject("Match", "input", "secret")));

        let names: Vec<&str> = outcome.sources().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Docs", "Match"]);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            Policy::from_path("policy.toml"),
            Err(PolicyError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}
