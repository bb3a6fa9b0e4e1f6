//! In-memory element source for testing without API access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::OsmError;
use super::source::ElementSource;
use super::types::{ElementType, Node, Relation, Way};

/// Mock OSM client that serves elements from memory.
///
/// Unknown IDs answer like the API does for a missing element (404).
#[derive(Debug, Default)]
pub struct MockOsmClient {
    relations: HashMap<i64, Relation>,
    ways: HashMap<i64, Way>,
    nodes: HashMap<i64, Node>,
    /// Relations that answer 410 Gone.
    gone: HashSet<i64>,
    /// Ways whose fetch never completes.
    stalled_ways: HashSet<i64>,
    /// Ways whose fetch fails with a timeout.
    timed_out_ways: HashSet<i64>,
    requests: AtomicUsize,
}

impl MockOsmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.insert(relation.id, relation);
        self
    }

    pub fn with_way(mut self, way: Way) -> Self {
        self.ways.insert(way.id, way);
        self
    }

    pub fn with_ways(self, ways: impl IntoIterator<Item = Way>) -> Self {
        ways.into_iter().fold(self, Self::with_way)
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.insert(node.id, node);
        self
    }

    pub fn with_nodes(self, nodes: impl IntoIterator<Item = Node>) -> Self {
        nodes.into_iter().fold(self, Self::with_node)
    }

    /// Mark a relation as deleted.
    pub fn with_gone(mut self, relation_id: i64) -> Self {
        self.gone.insert(relation_id);
        self
    }

    /// Make fetches of a way hang forever (for cancellation tests).
    pub fn with_stalled_way(mut self, way_id: i64) -> Self {
        self.stalled_ways.insert(way_id);
        self
    }

    /// Make fetches of a way fail as if the request timed out.
    pub fn with_timed_out_way(mut self, way_id: i64) -> Self {
        self.timed_out_ways.insert(way_id);
        self
    }

    /// Total number of fetches served so far, successful or not.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found(kind: ElementType, id: i64) -> OsmError {
    OsmError::Api {
        status: 404,
        body: format!("no mock data for {kind} {id}"),
    }
}

impl ElementSource for MockOsmClient {
    async fn get_relation(&self, id: i64) -> Result<Relation, OsmError> {
        self.record();
        if self.gone.contains(&id) {
            return Err(OsmError::Gone);
        }
        self.relations
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(ElementType::Relation, id))
    }

    async fn get_way(&self, id: i64) -> Result<Way, OsmError> {
        self.record();
        if self.stalled_ways.contains(&id) {
            std::future::pending::<()>().await;
        }
        if self.timed_out_ways.contains(&id) {
            return Err(OsmError::Timeout);
        }
        self.ways
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(ElementType::Way, id))
    }

    async fn get_node(&self, id: i64) -> Result<Node, OsmError> {
        self.record();
        self.nodes
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(ElementType::Node, id))
    }

    async fn get_parent_relations(&self, id: i64) -> Result<Vec<Relation>, OsmError> {
        self.record();
        let mut parents: Vec<Relation> = self
            .relations
            .values()
            .filter(|r| {
                r.members
                    .iter()
                    .any(|m| m.kind == ElementType::Relation && m.reference == id)
            })
            .cloned()
            .collect();
        parents.sort_by_key(|r| r.id);
        Ok(parents)
    }
}
