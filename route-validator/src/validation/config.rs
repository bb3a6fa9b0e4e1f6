//! Per-run validation policy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Configuration for validating routes and route masters.
///
/// Deserialises from the JSON carried by work items and routes files. Fields
/// absent from the JSON take their zero value; [`ValidationConfig::default`]
/// enables the import-tag check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Require `naptan:AtcoCode` on platform nodes.
    #[serde(default)]
    pub naptan_platform_tags: bool,

    /// Minimum number of node members on a route. Zero disables the check.
    #[serde(default)]
    pub minimum_node_members: usize,

    /// Minimum number of route variants on a route master. Zero disables the check.
    #[serde(default)]
    pub minimum_route_variants: usize,

    /// Ways whose one-way restriction is never enforced.
    #[serde(default)]
    pub ignore_traversal_direction_ways: HashSet<i64>,
}

impl ValidationConfig {
    /// Create a config with every optional check disabled.
    pub fn new() -> Self {
        Self {
            naptan_platform_tags: false,
            minimum_node_members: 0,
            minimum_route_variants: 0,
            ignore_traversal_direction_ways: HashSet::new(),
        }
    }

    pub fn with_naptan_platform_tags(mut self, enabled: bool) -> Self {
        self.naptan_platform_tags = enabled;
        self
    }

    pub fn with_minimum_node_members(mut self, n: usize) -> Self {
        self.minimum_node_members = n;
        self
    }

    pub fn with_minimum_route_variants(mut self, n: usize) -> Self {
        self.minimum_route_variants = n;
        self
    }

    /// Add ways whose traversal direction should not be checked.
    pub fn with_ignored_ways(mut self, ways: impl IntoIterator<Item = i64>) -> Self {
        self.ignore_traversal_direction_ways.extend(ways);
        self
    }

    /// Whether the caller asked for this way's direction to be ignored.
    pub fn is_way_direction_ignored(&self, way_id: i64) -> bool {
        self.ignore_traversal_direction_ways.contains(&way_id)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::new().with_naptan_platform_tags(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ValidationConfig::default();
        assert!(config.naptan_platform_tags);
        assert_eq!(config.minimum_node_members, 0);
        assert_eq!(config.minimum_route_variants, 0);
        assert!(config.ignore_traversal_direction_ways.is_empty());
    }

    #[test]
    fn builder() {
        let config = ValidationConfig::new()
            .with_minimum_node_members(4)
            .with_minimum_route_variants(2)
            .with_ignored_ways([10, 20]);

        assert!(!config.naptan_platform_tags);
        assert_eq!(config.minimum_node_members, 4);
        assert_eq!(config.minimum_route_variants, 2);
        assert!(config.is_way_direction_ignored(10));
        assert!(config.is_way_direction_ignored(20));
        assert!(!config.is_way_direction_ignored(30));
    }

    #[test]
    fn deserialize_from_json() {
        let json = r#"{
            "naptanPlatformTags": true,
            "minimumNodeMembers": 3,
            "ignoreTraversalDirectionWays": [61883421, 4871756]
        }"#;
        let config: ValidationConfig = serde_json::from_str(json).unwrap();

        assert!(config.naptan_platform_tags);
        assert_eq!(config.minimum_node_members, 3);
        assert_eq!(config.minimum_route_variants, 0);
        assert!(config.is_way_direction_ignored(4871756));
    }

    #[test]
    fn missing_fields_are_zero() {
        let config: ValidationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidationConfig::new());
    }
}
