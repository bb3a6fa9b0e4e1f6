//! OSM element types as returned by the API's JSON endpoints.
//!
//! The same types double as the domain model: relations, ways and nodes are
//! read-only snapshots for the duration of one validation pass.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL for human-facing element links.
const ELEMENT_URL_BASE: &str = "https://www.openstreetmap.org";

pub const ROLE_STOP: &str = "stop";
pub const ROLE_STOP_ENTRY_ONLY: &str = "stop_entry_only";
pub const ROLE_STOP_EXIT_ONLY: &str = "stop_exit_only";
pub const ROLE_PLATFORM: &str = "platform";
pub const ROLE_PLATFORM_ENTRY_ONLY: &str = "platform_entry_only";
pub const ROLE_PLATFORM_EXIT_ONLY: &str = "platform_exit_only";

/// Tag key to value mapping. No key is guaranteed to exist.
pub type Tags = HashMap<String, String>;

/// Envelope used by every element endpoint: `{"elements": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ElementsResponse<T> {
    pub elements: Vec<T>,
}

/// The three OSM element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl ElementType {
    /// Returns the lowercase name used in API paths and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link to an element on the OSM website.
pub fn element_url(kind: ElementType, id: i64) -> String {
    format!("{ELEMENT_URL_BASE}/{kind}/{id}")
}

/// A (type, ref, role) triple inside a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn new(kind: ElementType, reference: i64, role: impl Into<String>) -> Self {
        Self {
            kind,
            reference,
            role: role.into(),
        }
    }

    /// `stop`, `stop_entry_only` or `stop_exit_only`.
    pub fn is_stop(&self) -> bool {
        matches!(
            self.role.as_str(),
            ROLE_STOP | ROLE_STOP_ENTRY_ONLY | ROLE_STOP_EXIT_ONLY
        )
    }

    /// `platform`, `platform_entry_only` or `platform_exit_only`.
    pub fn is_platform(&self) -> bool {
        matches!(
            self.role.as_str(),
            ROLE_PLATFORM | ROLE_PLATFORM_ENTRY_ONLY | ROLE_PLATFORM_EXIT_ONLY
        )
    }

    /// Whether the role belongs to the leading stop/platform block of a route.
    pub fn is_stop_or_platform(&self) -> bool {
        self.is_stop() || self.is_platform()
    }

    /// A plain route segment: a way with an empty role.
    pub fn is_route_way(&self) -> bool {
        self.kind == ElementType::Way && self.role.is_empty()
    }

    pub fn element_url(&self) -> String {
        element_url(self.kind, self.reference)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.reference, self.role)
    }
}

/// A route or route master relation.
///
/// Member order is significant and kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: i64,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tags: Tags,
}

impl Relation {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// The `name` tag, if present.
    pub fn name(&self) -> Option<&str> {
        self.tag("name")
    }

    /// The `type` tag, if present.
    pub fn relation_type(&self) -> Option<&str> {
        self.tag("type")
    }

    /// Whether the relation is tagged `public_transport:version=2`.
    pub fn is_ptv2(&self) -> bool {
        self.tag("public_transport:version") == Some("2")
    }

    /// Number of members of a given element type.
    pub fn count_members(&self, kind: ElementType) -> usize {
        self.members.iter().filter(|m| m.kind == kind).count()
    }

    /// IDs of `relation` members, in member order.
    pub fn sub_relation_ids(&self) -> Vec<i64> {
        self.members
            .iter()
            .filter(|m| m.kind == ElementType::Relation)
            .map(|m| m.reference)
            .collect()
    }

    pub fn element_url(&self) -> String {
        element_url(ElementType::Relation, self.id)
    }
}

/// Error returned when a way has no nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("way {0} has no nodes")]
pub struct EmptyWay(pub i64);

#[derive(Deserialize)]
struct RawWay {
    id: i64,
    #[serde(default)]
    version: i32,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    tags: Tags,
}

impl TryFrom<RawWay> for Way {
    type Error = EmptyWay;

    fn try_from(raw: RawWay) -> Result<Self, Self::Error> {
        let mut way = Way::new(raw.id, raw.nodes, raw.tags)?;
        way.version = raw.version;
        Ok(way)
    }
}

/// A path segment: an ordered, non-empty list of node IDs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawWay")]
pub struct Way {
    pub id: i64,
    pub version: i32,
    nodes: Vec<i64>,
    pub tags: Tags,
}

impl Way {
    /// Create a way, rejecting an empty node list.
    pub fn new(id: i64, nodes: Vec<i64>, tags: Tags) -> Result<Self, EmptyWay> {
        if nodes.is_empty() {
            return Err(EmptyWay(id));
        }
        Ok(Self {
            id,
            version: 0,
            nodes,
            tags,
        })
    }

    pub fn nodes(&self) -> &[i64] {
        &self.nodes
    }

    pub fn first_node(&self) -> i64 {
        self.nodes[0]
    }

    pub fn last_node(&self) -> i64 {
        self.nodes[self.nodes.len() - 1]
    }

    /// A way is circular iff its first and last nodes are the same.
    pub fn is_circular(&self) -> bool {
        self.first_node() == self.last_node()
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn element_url(&self) -> String {
        element_url(ElementType::Way, self.id)
    }
}

/// A point: stop position, platform or plain path vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub tags: Tags,
}

impl Node {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn element_url(&self) -> String {
        element_url(ElementType::Node, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_relation_response() {
        let json = r#"{"version":"0.6","elements":[{"type":"relation","id":12,"version":3,
            "members":[{"type":"node","ref":1,"role":"stop"},{"type":"way","ref":2,"role":""}],
            "tags":{"type":"route","name":"1: A => B"}}]}"#;

        let resp: ElementsResponse<Relation> = serde_json::from_str(json).unwrap();
        let relation = &resp.elements[0];

        assert_eq!(relation.id, 12);
        assert_eq!(relation.version, 3);
        assert_eq!(relation.members.len(), 2);
        assert_eq!(relation.members[0].kind, ElementType::Node);
        assert!(relation.members[0].is_stop());
        assert!(relation.members[1].is_route_way());
        assert_eq!(relation.relation_type(), Some("route"));
        assert_eq!(relation.name(), Some("1: A => B"));
    }

    #[test]
    fn relation_without_tags_or_members() {
        let json = r#"{"elements":[{"type":"relation","id":5}]}"#;
        let resp: ElementsResponse<Relation> = serde_json::from_str(json).unwrap();
        assert!(resp.elements[0].members.is_empty());
        assert!(resp.elements[0].tags.is_empty());
    }

    #[test]
    fn parse_way_and_node() {
        let json = r#"{"elements":[{"type":"way","id":7,"version":2,"nodes":[1,2,3],
            "tags":{"oneway":"yes"}}]}"#;
        let resp: ElementsResponse<Way> = serde_json::from_str(json).unwrap();
        let way = &resp.elements[0];
        assert_eq!(way.nodes(), &[1, 2, 3]);
        assert_eq!(way.version, 2);
        assert_eq!(way.tag("oneway"), Some("yes"));

        let json = r#"{"elements":[{"type":"node","id":9,"lat":55.95,"lon":-3.19}]}"#;
        let resp: ElementsResponse<Node> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.elements[0].id, 9);
        assert!(resp.elements[0].tags.is_empty());
    }

    #[test]
    fn way_without_nodes_is_rejected() {
        let json = r#"{"elements":[{"type":"way","id":7,"nodes":[]}]}"#;
        let result: Result<ElementsResponse<Way>, _> = serde_json::from_str(json);
        assert!(result.is_err());

        assert_eq!(Way::new(7, vec![], Tags::new()), Err(EmptyWay(7)));
    }

    #[test]
    fn circular_way() {
        let way = Way::new(1, vec![1, 2, 3, 1], Tags::new()).unwrap();
        assert!(way.is_circular());
        assert_eq!(way.first_node(), 1);
        assert_eq!(way.last_node(), 1);

        let way = Way::new(2, vec![1, 2, 3], Tags::new()).unwrap();
        assert!(!way.is_circular());

        let single = Way::new(3, vec![4], Tags::new()).unwrap();
        assert!(single.is_circular());
    }

    #[test]
    fn member_roles() {
        let platform = Member::new(ElementType::Node, 1, ROLE_PLATFORM_EXIT_ONLY);
        assert!(platform.is_platform());
        assert!(!platform.is_stop());
        assert!(platform.is_stop_or_platform());

        let stop = Member::new(ElementType::Node, 1, ROLE_STOP_ENTRY_ONLY);
        assert!(stop.is_stop());

        let forward = Member::new(ElementType::Way, 1, "forward");
        assert!(!forward.is_route_way());
        assert!(!forward.is_stop_or_platform());
    }

    #[test]
    fn urls() {
        let member = Member::new(ElementType::Way, 42, "");
        assert_eq!(member.element_url(), "https://www.openstreetmap.org/way/42");
        assert_eq!(member.to_string(), "way 42 ()");
        assert_eq!(
            element_url(ElementType::Relation, 3),
            "https://www.openstreetmap.org/relation/3"
        );
    }

    #[test]
    fn sub_relations_and_counts() {
        let relation = Relation {
            id: 1,
            version: 1,
            members: vec![
                Member::new(ElementType::Relation, 10, ""),
                Member::new(ElementType::Node, 11, "stop"),
                Member::new(ElementType::Relation, 12, ""),
            ],
            tags: Tags::new(),
        };
        assert_eq!(relation.sub_relation_ids(), vec![10, 12]);
        assert_eq!(relation.count_members(ElementType::Node), 1);
        assert_eq!(relation.count_members(ElementType::Way), 0);
    }
}
