//! Validation findings and hard failures.
//!
//! A [`ValidationError`] is a finding about the data: it is collected and
//! reported, never raised. A [`ValidateError`] means the relation could not
//! be validated at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::osm::{ElementType, OsmError};

/// A single problem found in a relation or one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Link to the offending element, if there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub message: String,
}

impl ValidationError {
    /// A finding about the relation as a whole.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            url: None,
            message: message.into(),
        }
    }

    /// A finding about a specific element.
    pub fn at(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} - {}", self.message, url),
            None => f.write_str(&self.message),
        }
    }
}

/// Reasons a relation could not be validated.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// A member element could not be loaded
    #[error("failed to load {kind} {id}")]
    LoadFailed { kind: ElementType, id: i64 },

    /// A member element fetch timed out
    #[error("timed out loading {kind} {id}")]
    Timeout { kind: ElementType, id: i64 },

    /// The relation itself could not be fetched
    #[error("failed to fetch relation {id}: {source}")]
    Fetch {
        id: i64,
        #[source]
        source: OsmError,
    },

    /// The caller cancelled the run
    #[error("validation cancelled")]
    Cancelled,

    /// The relation is neither a route nor a route master
    #[error("relation {id} has unsupported type {relation_type:?}")]
    UnsupportedType {
        id: i64,
        relation_type: Option<String>,
    },
}

impl ValidateError {
    /// Whether we gave up (cancellation or timeout) rather than the API refusing.
    pub fn is_abandoned(&self) -> bool {
        match self {
            ValidateError::Cancelled | ValidateError::Timeout { .. } => true,
            ValidateError::Fetch { source, .. } => source.is_abandoned(),
            _ => false,
        }
    }

    /// Wrap a fetch failure for relation `id`, keeping cancellation distinct.
    pub fn fetch(id: i64, source: OsmError) -> Self {
        match source {
            OsmError::Cancelled => ValidateError::Cancelled,
            source => ValidateError::Fetch { id, source },
        }
    }

    /// Classify a failed member fetch: timeouts and cancellation are kept
    /// apart from the API refusing or returning bad data.
    pub fn member(kind: ElementType, id: i64, source: &OsmError) -> Self {
        match source {
            OsmError::Cancelled => ValidateError::Cancelled,
            OsmError::Timeout => ValidateError::Timeout { kind, id },
            _ => ValidateError::LoadFailed { kind, id },
        }
    }
}
