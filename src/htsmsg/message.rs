//! HTSP message field map
//!
//! An `HtsMessage` is a self-describing set of named fields. Field order has
//! no meaning. The typed getters return `FieldError` rather than `None` so
//! callers can tell a missing field from a mistyped one.

use std::collections::HashMap;
use std::fmt;

use crate::error::FieldError;

use super::value::HtsValue;

/// A decoded HTSMSG map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtsMessage {
    fields: HashMap<String, HtsValue>,
}

impl HtsMessage {
    /// Create an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with(mut self, name: impl Into<String>, value: impl Into<HtsValue>) -> Self {
        self.put(name, value);
        self
    }

    /// Set a field, returning the previous value if any
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<HtsValue>) -> Option<HtsValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, name: &str) -> Option<HtsValue> {
        self.fields.remove(name)
    }

    /// Check whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get a raw field value
    pub fn get(&self, name: &str) -> Option<&HtsValue> {
        self.fields.get(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the message has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HtsValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, name: &str) -> Result<&HtsValue, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::Missing(name.to_string()))
    }

    fn mismatch(name: &str, expected: &'static str) -> FieldError {
        FieldError::TypeMismatch {
            field: name.to_string(),
            expected,
        }
    }

    /// Get an integer field
    pub fn get_i64(&self, name: &str) -> Result<i64, FieldError> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, "s64"))
    }

    /// Get an integer field that must fit in a `u32`
    pub fn get_u32(&self, name: &str) -> Result<u32, FieldError> {
        let value = self.get_i64(name)?;
        u32::try_from(value).map_err(|_| FieldError::OutOfRange {
            field: name.to_string(),
            value,
        })
    }

    /// Get a string field
    pub fn get_str(&self, name: &str) -> Result<&str, FieldError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| Self::mismatch(name, "string"))
    }

    /// Get a list field
    pub fn get_list(&self, name: &str) -> Result<&[HtsValue], FieldError> {
        self.require(name)?
            .as_list()
            .ok_or_else(|| Self::mismatch(name, "list"))
    }

    /// Get a nested message field
    pub fn get_map(&self, name: &str) -> Result<&HtsMessage, FieldError> {
        self.require(name)?
            .as_map()
            .ok_or_else(|| Self::mismatch(name, "map"))
    }

    /// Get an integer field if present
    ///
    /// Absent yields `Ok(None)`; present with the wrong type is still an error.
    pub fn opt_i64(&self, name: &str) -> Result<Option<i64>, FieldError> {
        if self.contains(name) {
            self.get_i64(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Get a string field if present
    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, FieldError> {
        if self.contains(name) {
            self.get_str(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for HtsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted so log lines are stable
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();

        write!(f, "{{")?;
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, self.fields[key])?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<HtsValue>> FromIterator<(K, V)> for HtsMessage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for HtsMessage {
    type Item = (String, HtsValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, HtsValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
