use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Persistence(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DeskResult<T> = Result<T, DeskError>;

/// Per-field validation messages, keyed by the selection field name
/// (`instructor`, `courses`, `section`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns `Ok(())` when no field failed, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// One-line summary used as the result message for a rejected submission.
    pub fn summary(&self) -> String {
        let fields: Vec<&str> = self.fields().collect();
        match fields.len() {
            0 => String::new(),
            1 => format!("Please correct the {} field.", fields[0]),
            _ => format!("Please correct the following fields: {}.", fields.join(", ")),
        }
    }
}

impl From<FieldErrors> for DeskError {
    fn from(errors: FieldErrors) -> Self {
        DeskError::Validation(errors.summary())
    }
}
