//! Error and result types
//!
//! Two kinds of "error" live here and they must not be confused:
//!
//! - [`Error`] is a configuration problem (bad tag syntax, bad engine config).
//!   It is returned through `Result` and never produced by a failing rule.
//! - [`FieldErrors`] is the outcome of validating a record: a map from
//!   normalized field name to the messages of its failed rules. A failed rule
//!   is data, not an `Err`.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// Error type for engine setup and tag parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A tag entry has no rule name, e.g. `required,,min=3` or `=3`.
    #[error("malformed tag `{tag}`: {reason}")]
    MalformedTag { tag: String, reason: String },

    /// The engine configuration cannot be used.
    #[error("invalid engine config: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    pub(crate) fn malformed_tag(tag: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag: tag.to_owned(),
            reason: reason.into(),
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedTag { .. } => "TAG_MALFORMED",
            Self::InvalidConfig { .. } => "CONFIG_INVALID",
        }
    }
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// RULE FAILURE
// ============================================================================

/// One failed rule invocation, before message resolution.
///
/// `field` is the declared field name (not normalized) and `value` is the
/// rendered runtime value, kept for the third message placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    /// Declared field name.
    pub field: String,
    /// Rule that failed.
    pub rule: String,
    /// Rule parameter, empty when the tag entry had none.
    pub param: String,
    /// Rendered field value.
    pub value: String,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "{} failed `{}`", self.field, self.rule)
        } else {
            write!(f, "{} failed `{}={}`", self.field, self.rule, self.param)
        }
    }
}

// ============================================================================
// FIELD ERROR MAP
// ============================================================================

/// Field error map: normalized field name to ordered failure messages.
///
/// Keys appear in the order their first message was recorded; messages appear
/// in rule-evaluation order. A field with no messages is never a key.
///
/// Equality ignores key order, so two maps with the same contents compare
/// equal regardless of how fields were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to a field's list, creating the entry if needed.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        match self.fields.entry(field.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(message.into()),
            Entry::Vacant(entry) => {
                entry.insert(vec![message.into()]);
            }
        }
    }

    /// Messages recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns true if `field` has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Iterates over `(field, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Names of the fields that failed, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consumes the map and returns the underlying ordered map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.fields
    }
}

impl<K, M> FromIterator<(K, Vec<M>)> for FieldErrors
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<M>)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                errors.push(field.clone(), message);
            }
        }
        errors
    }
}

impl<K, M, const N: usize> From<[(K, Vec<M>); N]> for FieldErrors
where
    K: Into<String>,
    M: Into<String>,
{
    fn from(entries: [(K, Vec<M>); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validation failed for {} field(s):",
            self.fields.len()
        )?;
        for (field, messages) in &self.fields {
            for message in messages {
                writeln!(f, "  {field}: {message}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
