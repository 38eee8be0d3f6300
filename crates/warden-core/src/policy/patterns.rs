//! Named detection patterns usable from `forbid_pattern` checks.
//!
//! Presets spare policy authors from writing their own regexes for the
//! common leaks: personal data and credentials.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // =========================================================================
    // PII
    // =========================================================================

    /// Email address (RFC 5322 simplified)
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    /// US phone number with optional country code
    static ref PHONE_PATTERN: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?(?:\([0-9]{3}\)|[0-9]{3})[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"
    ).unwrap();

    /// Social Security Number (XXX-XX-XXXX or XXXXXXXXX)
    static ref SSN_PATTERN: Regex = Regex::new(
        r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b"
    ).unwrap();

    /// 16 digit card number with optional separators
    static ref CREDIT_CARD_PATTERN: Regex = Regex::new(
        r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b"
    ).unwrap();

    // =========================================================================
    // CREDENTIALS
    // =========================================================================

    /// api_key=xxx, secret: xxx, token=xxx, ...
    static ref API_KEY_PATTERN: Regex = Regex::new(
        r#"(?i)(api[_-]?key|secret[_-]?key|access[_-]?token|auth[_-]?token|bearer|password|secret|token)[\s:=]+['"]?[a-zA-Z0-9_-]{16,}['"]?"#
    ).unwrap();

    /// AWS access key ids (all documented prefixes)
    static ref AWS_KEY_PATTERN: Regex = Regex::new(
        r"(?i)(AKIA|ABIA|ACCA|AGPA|AIDA|AIPA|ANPA|ANVA|AROA|ASCA|ASIA)[A-Z0-9]{16}"
    ).unwrap();
}

/// A named pattern, or a named group of patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternPreset {
    Email,
    Phone,
    Ssn,
    CreditCard,
    ApiKey,
    AwsKey,
    /// Email, phone, SSN or card number
    Pii,
    /// API key or AWS key
    Credentials,
}

/// A located match: what was found and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub label: &'static str,
    pub start: usize,
    pub end: usize,
}

impl PatternPreset {
    fn patterns(self) -> Vec<(&'static str, &'static Regex)> {
        match self {
            PatternPreset::Email => vec![("Email address", &*EMAIL_PATTERN)],
            PatternPreset::Phone => vec![("Phone number", &*PHONE_PATTERN)],
            PatternPreset::Ssn => vec![("Social Security Number", &*SSN_PATTERN)],
            PatternPreset::CreditCard => vec![("Credit card number", &*CREDIT_CARD_PATTERN)],
            PatternPreset::ApiKey => vec![("API key or secret", &*API_KEY_PATTERN)],
            PatternPreset::AwsKey => vec![("AWS access key", &*AWS_KEY_PATTERN)],
            PatternPreset::Pii => [
                PatternPreset::Email,
                PatternPreset::Phone,
                PatternPreset::Ssn,
                PatternPreset::CreditCard,
            ]
            .into_iter()
            .flat_map(PatternPreset::patterns)
            .collect(),
            PatternPreset::Credentials => [PatternPreset::ApiKey, PatternPreset::AwsKey]
                .into_iter()
                .flat_map(PatternPreset::patterns)
                .collect(),
        }
    }

    /// First match in `text`, trying patterns in preset order.
    pub fn find(self, text: &str) -> Option<PatternMatch> {
        self.patterns().into_iter().find_map(|(label, pattern)| {
            pattern.find(text).map(|m| PatternMatch {
                label,
                start: m.start(),
                end: m.end(),
            })
        })
    }

    pub fn is_match(self, text: &str) -> bool {
        self.find(text).is_some()
    }
}
