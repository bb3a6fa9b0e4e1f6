//! OpenStreetMap API data client.
//!
//! Fetches relations, ways and nodes by ID. Relations are always read
//! fresh; ways and nodes go through a [`CachedSource`] scoped to a single
//! validation pass and are batch-loaded with bounded concurrency.

mod batch;
mod cache;
mod client;
mod error;
mod mock;
mod source;
mod types;

pub use batch::{BatchResult, DEFAULT_PARALLEL_REQUESTS, first_failure, load_many};
pub use cache::{CachedSource, ElementCache};
pub use client::{OsmClient, OsmConfig};
pub use error::OsmError;
pub use mock::MockOsmClient;
pub use source::ElementSource;
pub use types::{
    ElementType, ElementsResponse, EmptyWay, Member, Node, ROLE_PLATFORM,
    ROLE_PLATFORM_ENTRY_ONLY, ROLE_PLATFORM_EXIT_ONLY, ROLE_STOP, ROLE_STOP_ENTRY_ONLY,
    ROLE_STOP_EXIT_ONLY, Relation, Tags, Way, element_url,
};
