//! Per-field collection of validation messages

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name to ordered error messages.
///
/// Fields keep the order in which they first failed and each field keeps its
/// messages in the order the rules ran, so templates can display them as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field, creating the entry on first failure
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// A pass is valid iff no field collected a message
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// All messages for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// First message for a field, what a single-line form hint shows
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Total number of messages across all fields
    pub fn message_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Fold another map in, appending to fields that already exist
    pub fn merge(&mut self, other: ErrorMap) {
        for (field, mut messages) in other.errors {
            self.errors.entry(field).or_default().append(&mut messages);
        }
    }

    pub fn into_result(self) -> Result<(), ErrorMap> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
