//! Evidence attached to failing outcomes.
//!
//! Every outcome carries an ordered list of sources that back it up: a
//! policy document, a runbook entry, the offending span of the subject.

use serde::{Deserialize, Serialize};

/// A single piece of evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Display name (e.g., "Security policy")
    pub name: String,

    /// Where the evidence lives (URL, file path, pointer into the subject)
    pub reference: String,

    /// The quoted or summarised content
    pub content: String,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            content: content.into(),
        }
    }

    /// Evidence pointing at a field of the evaluated subject.
    pub fn from_subject(name: impl Into<String>, field: &str, content: impl Into<String>) -> Self {
        Self::new(name, format!("subject.{}", field), content)
    }
}

/// Ordered collection of [`Source`]s. Insertion order is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SourceMap {
    sources: Vec<Source>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append sources, keeping their order.
    pub fn add<I>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = Source>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }
}

impl From<Vec<Source>> for SourceMap {
    fn from(sources: Vec<Source>) -> Self {
        Self { sources }
    }
}

impl FromIterator<Source> for SourceMap {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SourceMap {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

impl IntoIterator for SourceMap {
    type Item = Source;
    type IntoIter = std::vec::IntoIter<Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.into_iter()
    }
}
