//! Checks on the stop and platform nodes of a route.

use std::collections::HashMap;
use std::sync::Arc;

use crate::osm::{ElementType, Node, Relation};

use super::config::ValidationConfig;
use super::error::ValidationError;
use super::tags::check_tags_present;

/// Tag identifying the imported stop record (NaPTAN ATCO code).
const IMPORT_SOURCE_TAG: &str = "naptan:AtcoCode";

/// Check a node used with a platform role.
///
/// `highway` may be absent: imported platforms often leave it off so that
/// they do not render twice. If present it must be `bus_stop`.
pub fn validate_platform_node(node: &Node, check_import_tags: bool) -> Vec<ValidationError> {
    let url = node.element_url();
    let mut errors = Vec::new();

    match node.tag("public_transport") {
        None => errors.push(ValidationError::at(
            &url,
            "node is missing public_transport tag",
        )),
        Some("platform") => {}
        Some(_) => errors.push(ValidationError::at(
            &url,
            "node should have public_transport=platform",
        )),
    }

    if node.tag("disused:highway").is_some() {
        errors.push(ValidationError::at(&url, "node has disused:highway tag"));
    }

    if node.tag("highway").is_some_and(|v| v != "bus_stop") {
        errors.push(ValidationError::at(&url, "node should have highway=bus_stop"));
    }

    if node.tag("name").is_none_or(str::is_empty) {
        errors.push(ValidationError::at(&url, "node is missing name tag"));
    }

    if check_import_tags {
        errors.extend(check_tags_present(node, &[IMPORT_SOURCE_TAG]));
    }

    errors
}

/// Check a node used with a stop role.
pub fn validate_stop_node(node: &Node) -> Vec<ValidationError> {
    let url = node.element_url();
    let mut errors = Vec::new();

    match node.tag("public_transport") {
        None => errors.push(ValidationError::at(
            &url,
            "node is missing public_transport tag",
        )),
        Some("stop_position") => {}
        Some(_) => errors.push(ValidationError::at(
            &url,
            "node should have public_transport=stop_position",
        )),
    }

    if node.tag("bus").is_some_and(|v| v != "yes") {
        errors.push(ValidationError::at(&url, "node should have bus=yes"));
    }

    if node.tag("name").is_none_or(str::is_empty) {
        errors.push(ValidationError::at(&url, "node is missing name tag"));
    }

    errors
}

/// Run the stop/platform checks over every node member, in member order.
///
/// `nodes` must contain every node member; members missing from it are skipped.
pub fn validate_member_nodes(
    relation: &Relation,
    nodes: &HashMap<i64, Arc<Node>>,
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for member in relation
        .members
        .iter()
        .filter(|m| m.kind == ElementType::Node)
    {
        let Some(node) = nodes.get(&member.reference) else {
            continue;
        };

        if member.is_platform() {
            errors.extend(validate_platform_node(node, config.naptan_platform_tags));
        }
        if member.is_stop() {
            errors.extend(validate_stop_node(node));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{Member, Tags};

    fn node(id: i64, tags: &[(&str, &str)]) -> Node {
        Node {
            id,
            lat: 55.95,
            lon: -3.19,
            version: 1,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Tags>(),
        }
    }

    fn messages(errors: Vec<ValidationError>) -> Vec<String> {
        errors.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn valid_platform() {
        let n = node(
            1,
            &[
                ("public_transport", "platform"),
                ("highway", "bus_stop"),
                ("name", "Princes Street"),
                ("naptan:AtcoCode", "6200200000"),
            ],
        );
        assert!(validate_platform_node(&n, true).is_empty());
    }

    #[test]
    fn platform_without_highway_is_tolerated() {
        let n = node(1, &[("public_transport", "platform"), ("name", "X")]);
        assert!(validate_platform_node(&n, false).is_empty());
    }

    #[test]
    fn platform_problems() {
        let n = node(
            1,
            &[
                ("public_transport", "stop_position"),
                ("highway", "platform"),
                ("disused:highway", "bus_stop"),
            ],
        );
        assert_eq!(
            messages(validate_platform_node(&n, true)),
            vec![
                "node should have public_transport=platform",
                "node has disused:highway tag",
                "node should have highway=bus_stop",
                "node is missing name tag",
                "missing tag 'naptan:AtcoCode'",
            ]
        );
    }

    #[test]
    fn platform_missing_public_transport() {
        let n = node(1, &[("name", "X")]);
        let errors = validate_platform_node(&n, false);
        assert_eq!(messages(errors.clone()), vec!["node is missing public_transport tag"]);
        assert_eq!(
            errors[0].url.as_deref(),
            Some("https://www.openstreetmap.org/node/1")
        );
    }

    #[test]
    fn import_tag_check_follows_config() {
        let n = node(1, &[("public_transport", "platform"), ("name", "X")]);
        assert!(validate_platform_node(&n, false).is_empty());
        assert_eq!(validate_platform_node(&n, true).len(), 1);
    }

    #[test]
    fn stop_checks() {
        let ok = node(
            1,
            &[
                ("public_transport", "stop_position"),
                ("bus", "yes"),
                ("name", "Princes Street"),
            ],
        );
        assert!(validate_stop_node(&ok).is_empty());

        let no_bus_tag = node(2, &[("public_transport", "stop_position"), ("name", "X")]);
        assert!(validate_stop_node(&no_bus_tag).is_empty());

        let bad = node(
            3,
            &[("public_transport", "platform"), ("bus", "no"), ("name", "X")],
        );
        assert_eq!(
            messages(validate_stop_node(&bad)),
            vec![
                "node should have public_transport=stop_position",
                "node should have bus=yes",
            ]
        );

        let missing = node(4, &[]);
        assert_eq!(
            messages(validate_stop_node(&missing)),
            vec!["node is missing public_transport tag", "node is missing name tag"]
        );
    }

    #[test]
    fn unnamed_stops_and_platforms() {
        let unnamed_stop = node(5, &[("public_transport", "stop_position")]);
        let errors = validate_stop_node(&unnamed_stop);
        assert_eq!(messages(errors.clone()), vec!["node is missing name tag"]);
        assert_eq!(
            errors[0].url.as_deref(),
            Some("https://www.openstreetmap.org/node/5")
        );

        let blank_stop = node(6, &[("public_transport", "stop_position"), ("name", "")]);
        assert_eq!(messages(validate_stop_node(&blank_stop)), vec!["node is missing name tag"]);

        let blank_platform = node(7, &[("public_transport", "platform"), ("name", "")]);
        assert_eq!(
            messages(validate_platform_node(&blank_platform, false)),
            vec!["node is missing name tag"]
        );
    }

    #[test]
    fn member_nodes_use_roles() {
        let relation = Relation {
            id: 1,
            version: 1,
            members: vec![
                Member::new(ElementType::Node, 1, "stop_entry_only"),
                Member::new(ElementType::Node, 2, "platform_exit_only"),
                Member::new(ElementType::Way, 3, ""),
            ],
            tags: Tags::new(),
        };
        let mut nodes = HashMap::new();
        // Valid as a platform, so invalid as a stop and vice versa.
        nodes.insert(1, Arc::new(node(1, &[("public_transport", "platform"), ("name", "A")])));
        nodes.insert(2, Arc::new(node(2, &[("public_transport", "stop_position")])));

        let config = ValidationConfig::new();
        let errors = validate_member_nodes(&relation, &nodes, &config);
        let urls: Vec<Option<String>> = errors.iter().map(|e| e.url.clone()).collect();

        assert_eq!(
            messages(errors),
            vec![
                "node should have public_transport=stop_position",
                "node should have public_transport=platform",
                "node is missing name tag",
            ]
        );
        assert_eq!(urls[0].as_deref(), Some("https://www.openstreetmap.org/node/1"));
        assert_eq!(urls[1].as_deref(), Some("https://www.openstreetmap.org/node/2"));
    }
}
