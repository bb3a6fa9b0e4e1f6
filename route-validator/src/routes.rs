//! Routes files: a validation config plus named lists of routes to check.
//!
//! ```json
//! {
//!   "config": { "naptanPlatformTags": true, "minimumNodeMembers": 2 },
//!   "routes": {
//!     "Lothian Buses": [ { "name": "10", "relation_id": 4241 } ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::notify::CheckRelationEvent;
use crate::validation::ValidationConfig;

/// Errors from reading a routes file.
#[derive(Debug, thiserror::Error)]
pub enum RoutesError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One route in a routes file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    /// Entries with an ID below 1 are placeholders and are not checked.
    #[serde(default)]
    pub relation_id: i64,
    /// Temporarily excluded from scheduled runs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
}

impl RouteEntry {
    fn is_checkable(&self) -> bool {
        self.relation_id >= 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesFile {
    #[serde(default)]
    pub config: ValidationConfig,
    /// Route lists keyed by group name (usually the operator).
    #[serde(default)]
    pub routes: BTreeMap<String, Vec<RouteEntry>>,
}

impl RoutesFile {
    /// Read and parse a routes file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoutesError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| RoutesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| RoutesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every entry with a real relation ID, grouped, in file order within a group.
    pub fn checkable(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.routes.iter().flat_map(|(group, entries)| {
            entries
                .iter()
                .filter(|e| e.is_checkable())
                .map(move |e| (group.as_str(), e))
        })
    }

    /// Work items for a scheduled run: checkable entries not marked `skip`.
    pub fn check_events(&self) -> Vec<CheckRelationEvent> {
        self.checkable()
            .filter(|(_, entry)| !entry.skip)
            .map(|(_, entry)| CheckRelationEvent::new(entry.relation_id, self.config.clone()))
            .collect()
    }
}
