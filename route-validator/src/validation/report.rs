//! Per-relation validation results.

use std::fmt;

use crate::osm::{ElementType, element_url};

use super::error::{ValidateError, ValidationError};

/// Which pass a relation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Route,
    RouteMaster,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Route => f.write_str("route"),
            RelationKind::RouteMaster => f.write_str("route_master"),
        }
    }
}

/// The findings for one relation.
#[derive(Debug, Clone)]
pub struct RelationReport {
    pub relation_id: i64,
    pub name: Option<String>,
    pub kind: RelationKind,
    pub findings: Vec<ValidationError>,
    /// `relation` members, for route masters. Empty for routes.
    pub sub_relations: Vec<i64>,
}

impl RelationReport {
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn url(&self) -> String {
        element_url(ElementType::Relation, self.relation_id)
    }
}

/// What happened when a relation was looked up and validated.
#[derive(Debug, Clone)]
pub enum Outcome {
    Checked(RelationReport),
    /// The relation has been deleted upstream.
    Gone { relation_id: i64 },
}

impl Outcome {
    pub fn relation_id(&self) -> i64 {
        match self {
            Outcome::Checked(report) => report.relation_id,
            Outcome::Gone { relation_id } => *relation_id,
        }
    }

    /// True only for a checked relation with no findings.
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Checked(report) if report.is_valid())
    }
}

/// A route master's own outcome plus one result per variant.
#[derive(Debug)]
pub struct GroupReport {
    pub group: Outcome,
    pub variants: Vec<(i64, Result<Outcome, ValidateError>)>,
}

impl GroupReport {
    /// Whether the group and all its variants validated cleanly.
    pub fn is_valid(&self) -> bool {
        self.group.is_valid()
            && self
                .variants
                .iter()
                .all(|(_, result)| matches!(result, Ok(outcome) if outcome.is_valid()))
    }
}

/// Result of validating a relation of either kind.
#[derive(Debug)]
pub enum Validation {
    Route(RelationReport),
    RouteMaster(GroupReport),
    /// The relation has been deleted upstream.
    Gone { relation_id: i64 },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        match self {
            Validation::Route(report) => report.is_valid(),
            Validation::RouteMaster(group) => group.is_valid(),
            Validation::Gone { .. } => false,
        }
    }
}
