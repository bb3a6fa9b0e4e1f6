//! Tag presence and value checks.

use crate::osm::{Node, Relation, Tags, Way};

use super::error::ValidationError;

/// Tags every route relation must carry.
const REQUIRED_ROUTE_TAGS: [&str; 5] = ["from", "to", "name", "operator", "ref"];

/// Something with tags and a URL to blame.
pub trait Taggable {
    fn tags(&self) -> &Tags;
    fn element_url(&self) -> String;
}

impl Taggable for Relation {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn element_url(&self) -> String {
        Relation::element_url(self)
    }
}

impl Taggable for Way {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn element_url(&self) -> String {
        Way::element_url(self)
    }
}

impl Taggable for Node {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn element_url(&self) -> String {
        Node::element_url(self)
    }
}

/// One finding per key that is absent, in the order given.
pub fn check_tags_present<T: Taggable + ?Sized>(element: &T, keys: &[&str]) -> Vec<ValidationError> {
    let tags = element.tags();
    keys.iter()
        .filter(|key| !tags.contains_key(**key))
        .map(|key| ValidationError::at(element.element_url(), format!("missing tag '{key}'")))
        .collect()
}

/// A finding if `key` is absent or does not equal `expected`.
pub fn check_tag_value<T: Taggable + ?Sized>(
    element: &T,
    key: &str,
    expected: &str,
) -> Option<ValidationError> {
    match element.tags().get(key) {
        None => Some(ValidationError::at(
            element.element_url(),
            format!("missing tag '{key}'"),
        )),
        Some(value) if value != expected => Some(ValidationError::at(
            element.element_url(),
            format!("tag '{key}' should have value '{expected}'"),
        )),
        Some(_) => None,
    }
}

/// The `public_transport:version=2` gate. A failure here ends validation.
pub fn check_ptv2(relation: &Relation) -> Option<ValidationError> {
    if relation.is_ptv2() {
        return None;
    }
    Some(ValidationError::at(
        relation.element_url(),
        "tag 'public_transport:version' should have value '2'",
    ))
}

/// Required descriptive tags on a route relation.
pub fn validate_route_tags(relation: &Relation) -> Vec<ValidationError> {
    let mut errors = check_tags_present(relation, &REQUIRED_ROUTE_TAGS);
    errors.extend(check_tag_value(relation, "type", "route"));
    errors
}
