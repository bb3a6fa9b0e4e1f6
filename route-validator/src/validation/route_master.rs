//! Route-master (route group) checks.

use crate::osm::{ElementType, Relation};

use super::config::ValidationConfig;
use super::error::ValidationError;
use super::tags::check_tags_present;

const REQUIRED_GROUP_TAGS: [&str; 3] = ["name", "ref", "operator"];

/// Check a route master's own members and tags.
///
/// The variants themselves are validated separately, as routes.
pub fn validate_route_master(
    relation: &Relation,
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = relation
        .members
        .iter()
        .filter(|m| m.kind != ElementType::Relation)
        .map(|m| ValidationError::at(m.element_url(), "member is not a relation"))
        .collect();

    errors.extend(check_tags_present(relation, &REQUIRED_GROUP_TAGS));

    let minimum = config.minimum_route_variants;
    if minimum > 0 && relation.count_members(ElementType::Relation) < minimum {
        errors.push(ValidationError::at(
            relation.element_url(),
            "not enough route variants",
        ));
    }

    errors
}
