//! Member ordering, role syntax and member counts.

use crate::osm::{ElementType, Relation};

use super::config::ValidationConfig;
use super::error::ValidationError;

/// Check that stops and platforms come before route ways, and that roles
/// are well formed.
///
/// A PTv2 route lists every stop/platform first, then the ways in travel
/// order. Unknown roles and role-less nodes are reported per member.
pub fn validate_member_order(relation: &Relation) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut started_stops = false;
    let mut started_route = false;
    let mut route_before_stops = false;
    let mut stop_after_route = false;

    for member in &relation.members {
        if member.is_stop_or_platform() {
            started_stops = true;
            if started_route {
                stop_after_route = true;
            }
        } else {
            started_route = true;
            if !started_stops {
                route_before_stops = true;
            }
        }

        if member.kind == ElementType::Node && member.role.is_empty() {
            errors.push(ValidationError::at(
                member.element_url(),
                "stop/platform with empty role",
            ));
        }

        if !member.role.is_empty() && !member.is_stop_or_platform() {
            errors.push(ValidationError::at(
                member.element_url(),
                format!("element has unexpected role '{}'", member.role),
            ));
        }
    }

    if route_before_stops {
        errors.push(ValidationError::new("route way appears before stop/platform"));
    }
    if stop_after_route {
        errors.push(ValidationError::new("stop/platform appears after route ways"));
    }
    if !started_stops {
        errors.push(ValidationError::new("route does not contain a stop/platform"));
    }
    if !started_route {
        errors.push(ValidationError::new("route does not contain any route ways"));
    }

    errors
}

/// A finding if the route has fewer node members than the configured minimum.
pub fn check_node_member_count(
    relation: &Relation,
    config: &ValidationConfig,
) -> Option<ValidationError> {
    let minimum = config.minimum_node_members;
    if minimum == 0 || relation.count_members(ElementType::Node) >= minimum {
        return None;
    }
    Some(ValidationError::at(
        relation.element_url(),
        "relation does not have enough node members",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{Member, Tags};

    fn relation(members: Vec<Member>) -> Relation {
        Relation {
            id: 1,
            version: 1,
            members,
            tags: Tags::new(),
        }
    }

    fn messages(errors: Vec<ValidationError>) -> Vec<String> {
        errors.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn well_ordered_members() {
        let r = relation(vec![
            Member::new(ElementType::Node, 1, "stop"),
            Member::new(ElementType::Node, 2, "platform"),
            Member::new(ElementType::Way, 3, "platform"),
            Member::new(ElementType::Way, 10, ""),
            Member::new(ElementType::Way, 11, ""),
        ]);
        assert!(validate_member_order(&r).is_empty());
    }

    #[test]
    fn way_before_stop() {
        let r = relation(vec![
            Member::new(ElementType::Way, 10, ""),
            Member::new(ElementType::Node, 1, "stop"),
            Member::new(ElementType::Way, 11, ""),
            Member::new(ElementType::Node, 2, "platform"),
        ]);
        assert_eq!(
            messages(validate_member_order(&r)),
            vec![
                "route way appears before stop/platform",
                "stop/platform appears after route ways",
            ]
        );
    }

    #[test]
    fn empty_and_unexpected_roles() {
        let r = relation(vec![
            Member::new(ElementType::Node, 1, ""),
            Member::new(ElementType::Node, 2, "stop"),
            Member::new(ElementType::Way, 10, "forward"),
        ]);
        let errors = validate_member_order(&r);
        let msgs = messages(errors.clone());
        assert!(msgs.contains(&"stop/platform with empty role".to_string()));
        assert!(msgs.contains(&"element has unexpected role 'forward'".to_string()));
        assert_eq!(
            errors[0].url.as_deref(),
            Some("https://www.openstreetmap.org/node/1")
        );
    }

    #[test]
    fn missing_phases() {
        let only_stops = relation(vec![Member::new(ElementType::Node, 1, "stop")]);
        assert_eq!(
            messages(validate_member_order(&only_stops)),
            vec!["route does not contain any route ways"]
        );

        let only_ways = relation(vec![Member::new(ElementType::Way, 1, "")]);
        assert_eq!(
            messages(validate_member_order(&only_ways)),
            vec![
                "route way appears before stop/platform",
                "route does not contain a stop/platform",
            ]
        );
    }

    #[test]
    fn node_member_count() {
        let r = relation(vec![
            Member::new(ElementType::Node, 1, "stop"),
            Member::new(ElementType::Way, 10, ""),
        ]);

        let disabled = ValidationConfig::new();
        assert!(check_node_member_count(&r, &disabled).is_none());

        let enough = ValidationConfig::new().with_minimum_node_members(1);
        assert!(check_node_member_count(&r, &enough).is_none());

        let too_few = ValidationConfig::new().with_minimum_node_members(2);
        let error = check_node_member_count(&r, &too_few).unwrap();
        assert_eq!(error.message, "relation does not have enough node members");
    }
}
