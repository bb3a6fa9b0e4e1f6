//! Outbound notification payloads and inbound work items.
//!
//! These are the JSON messages exchanged with whatever queue or topic
//! delivers work to the validator and carries its results away. The
//! validator only builds them; delivery is up to the caller.

use serde::{Deserialize, Serialize};

use crate::osm::{ElementType, element_url};
use crate::validation::{Outcome, RelationReport, ValidationConfig, ValidationError};

/// Message for the single finding published when a relation is deleted.
pub const RELATION_GONE_MESSAGE: &str = "relation no longer exists";

/// A relation failed validation, or no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRelationEvent {
    #[serde(rename = "relationID")]
    pub relation_id: i64,
    #[serde(rename = "relationURL")]
    pub relation_url: String,
    #[serde(rename = "relationName", default)]
    pub relation_name: String,
    #[serde(rename = "validationErrors")]
    pub validation_errors: Vec<ValidationError>,
}

impl InvalidRelationEvent {
    /// Build an event from a report. Clean reports produce nothing.
    pub fn from_report(report: &RelationReport) -> Option<Self> {
        if report.is_valid() {
            return None;
        }
        Some(Self {
            relation_id: report.relation_id,
            relation_url: report.url(),
            relation_name: report.name.clone().unwrap_or_default(),
            validation_errors: report.findings.clone(),
        })
    }

    /// The event for a relation that has been deleted upstream.
    pub fn gone(relation_id: i64) -> Self {
        Self {
            relation_id,
            relation_url: element_url(ElementType::Relation, relation_id),
            relation_name: String::new(),
            validation_errors: vec![ValidationError::new(RELATION_GONE_MESSAGE)],
        }
    }

    /// The event to publish for an outcome, if any.
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Checked(report) => Self::from_report(report),
            Outcome::Gone { relation_id } => Some(Self::gone(*relation_id)),
        }
    }

    /// Subject line for topics that support one.
    pub fn subject(&self) -> String {
        if self.is_gone() {
            format!("Unknown relation {}", self.relation_id)
        } else {
            format!("Invalid relation {}", self.relation_id)
        }
    }

    fn is_gone(&self) -> bool {
        matches!(
            self.validation_errors.as_slice(),
            [only] if only.url.is_none() && only.message == RELATION_GONE_MESSAGE
        )
    }
}

/// A request to validate one relation with a given config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRelationEvent {
    #[serde(rename = "relationID")]
    pub relation_id: i64,
    #[serde(default)]
    pub config: ValidationConfig,
}

impl CheckRelationEvent {
    pub fn new(relation_id: i64, config: ValidationConfig) -> Self {
        Self {
            relation_id,
            config,
        }
    }

    /// One work item per variant of a checked route master, sharing `config`.
    ///
    /// Route reports have no variants and yield nothing.
    pub fn for_variants(report: &RelationReport, config: &ValidationConfig) -> Vec<Self> {
        report
            .sub_relations
            .iter()
            .map(|&id| Self::new(id, config.clone()))
            .collect()
    }
}
