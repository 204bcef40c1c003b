//! Secondary-name labels registered under the root name

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum label length in bytes
pub const MAX_LABEL_LEN: usize = 63;

/// User-chosen secondary name registered under the root name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    /// Create a new label from string
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the label is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate label format
    ///
    /// Labels are lowercase ASCII alphanumerics and hyphens, non-empty,
    /// at most [`MAX_LABEL_LEN`] bytes, with no leading or trailing hyphen.
    pub fn is_valid(&self) -> bool {
        let label = &self.0;
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
        label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    }

    /// Validate and return a precise error for invalid labels
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(LabelError::Invalid {
                label: self.0.clone(),
            })
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised during label validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("invalid label: {label}")]
    Invalid { label: String },
}
