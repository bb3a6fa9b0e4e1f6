//! The seam between the validators and wherever elements come from.

use std::future::Future;

use super::error::OsmError;
use super::types::{Node, Relation, Way};

/// Fetches single elements by ID.
///
/// Implemented by [`OsmClient`](super::OsmClient) for live data and by
/// [`MockOsmClient`](super::MockOsmClient) for tests. Implementations do not
/// cache; per-run caching is layered on top by
/// [`CachedSource`](super::CachedSource).
pub trait ElementSource {
    /// Fetch a relation. Returns [`OsmError::Gone`] if it has been deleted.
    fn get_relation(&self, id: i64) -> impl Future<Output = Result<Relation, OsmError>> + Send;

    fn get_way(&self, id: i64) -> impl Future<Output = Result<Way, OsmError>> + Send;

    fn get_node(&self, id: i64) -> impl Future<Output = Result<Node, OsmError>> + Send;

    /// Relations that have the given relation as a member.
    fn get_parent_relations(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Vec<Relation>, OsmError>> + Send;
}
