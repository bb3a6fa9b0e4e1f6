//! Per-run element cache.
//!
//! Ways and nodes are shared between the member lists of a route and are
//! fetched in parallel, so they are cached for the lifetime of one
//! validation pass. Relations are never cached: they are the subject under
//! test and must always be read fresh.
//!
//! A cache must not outlive its pass. Elements change version between runs,
//! and nothing is ever evicted while a pass is in progress.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::batch::{BatchResult, load_many};
use super::error::OsmError;
use super::source::ElementSource;
use super::types::{Node, Relation, Way};

/// Ways and nodes fetched during one validation pass, keyed by ID.
pub struct ElementCache {
    ways: MokaCache<i64, Arc<Way>>,
    nodes: MokaCache<i64, Arc<Node>>,
}

impl ElementCache {
    /// Create an empty, unbounded cache.
    pub fn new() -> Self {
        Self {
            ways: MokaCache::builder().build(),
            nodes: MokaCache::builder().build(),
        }
    }

    pub async fn get_way(&self, id: i64) -> Option<Arc<Way>> {
        self.ways.get(&id).await
    }

    pub async fn insert_way(&self, id: i64, way: Arc<Way>) {
        self.ways.insert(id, way).await;
    }

    pub async fn get_node(&self, id: i64) -> Option<Arc<Node>> {
        self.nodes.get(&id).await
    }

    pub async fn insert_node(&self, id: i64, node: Arc<Node>) {
        self.nodes.insert(id, node).await;
    }

    /// Number of cached (ways, nodes).
    pub async fn entry_counts(&self) -> (u64, u64) {
        self.ways.run_pending_tasks().await;
        self.nodes.run_pending_tasks().await;
        (self.ways.entry_count(), self.nodes.entry_count())
    }
}

impl Default for ElementCache {
    fn default() -> Self {
        Self::new()
    }
}

/// An [`ElementSource`] with a cache scoped to one validation pass.
///
/// Wraps a borrowed source; drop it at the end of the pass.
pub struct CachedSource<'a, S> {
    source: &'a S,
    cache: ElementCache,
}

impl<'a, S: ElementSource> CachedSource<'a, S> {
    /// Start a new pass with an empty cache.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            cache: ElementCache::new(),
        }
    }

    /// Fetch a relation, always bypassing the cache.
    pub async fn get_relation(&self, id: i64) -> Result<Relation, OsmError> {
        self.source.get_relation(id).await
    }

    /// Fetch a way, from the cache if this pass has already seen it.
    pub async fn get_way(&self, id: i64) -> Result<Arc<Way>, OsmError> {
        if let Some(cached) = self.cache.get_way(id).await {
            trace!(way_id = id, "way cache hit");
            return Ok(cached);
        }

        let way = Arc::new(self.source.get_way(id).await?);
        self.cache.insert_way(id, way.clone()).await;
        Ok(way)
    }

    /// Fetch a node, from the cache if this pass has already seen it.
    pub async fn get_node(&self, id: i64) -> Result<Arc<Node>, OsmError> {
        if let Some(cached) = self.cache.get_node(id).await {
            trace!(node_id = id, "node cache hit");
            return Ok(cached);
        }

        let node = Arc::new(self.source.get_node(id).await?);
        self.cache.insert_node(id, node.clone()).await;
        Ok(node)
    }

    /// Batch-load ways through the cache.
    pub async fn load_ways(
        &self,
        ids: &[i64],
        parallel: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchResult<Arc<Way>>, OsmError> {
        load_many(ids, parallel, cancel, |id| self.get_way(id)).await
    }

    /// Batch-load nodes through the cache.
    pub async fn load_nodes(
        &self,
        ids: &[i64],
        parallel: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchResult<Arc<Node>>, OsmError> {
        load_many(ids, parallel, cancel, |id| self.get_node(id)).await
    }

    pub fn cache(&self) -> &ElementCache {
        &self.cache
    }

    /// Access the underlying source for operations that bypass the cache.
    pub fn source(&self) -> &S {
        self.source
    }
}
