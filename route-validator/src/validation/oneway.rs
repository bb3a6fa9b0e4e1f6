//! One-way restriction compliance.

use crate::osm::Way;

use super::config::ValidationConfig;
use super::error::ValidationError;
use super::way_order::{DirectedWay, Traversal};

/// Ways with temporary roadworks restrictions that are never flagged.
const KNOWN_ROADWORKS: [i64; 4] = [61883421, 4871756, 9234350, 224830909];

/// The effective one-way value for a bus on this way.
///
/// Most specific tag wins: `oneway:psv`, then `oneway:bus`, then `oneway`.
/// Roundabouts are implicitly one-way.
pub fn oneway_tag(way: &Way) -> Option<&str> {
    way.tag("oneway:psv")
        .or_else(|| way.tag("oneway:bus"))
        .or_else(|| way.tag("oneway"))
        .or_else(|| (way.tag("junction") == Some("roundabout")).then_some("yes"))
}

/// Whether travelling `way` in `traversal` direction is allowed.
///
/// Unrecognised one-way values are let through.
pub fn is_traversal_permitted(
    way: &Way,
    traversal: Traversal,
    config: &ValidationConfig,
) -> bool {
    let Some(tag) = oneway_tag(way) else {
        return true;
    };

    if config.is_way_direction_ignored(way.id) || KNOWN_ROADWORKS.contains(&way.id) {
        return true;
    }

    match tag {
        "no" | "alternating" | "reversible" => true,
        "yes" | "true" | "1" => matches!(traversal, Traversal::Forward | Traversal::Either),
        "-1" | "reverse" => matches!(traversal, Traversal::Reverse | Traversal::Either),
        _ => true,
    }
}

/// One finding per resolved way travelled against its one-way restriction.
pub fn check_oneway(ways: &[DirectedWay], config: &ValidationConfig) -> Vec<ValidationError> {
    ways.iter()
        .filter(|d| d.traversal.is_resolved())
        .filter(|d| !is_traversal_permitted(&d.way, d.traversal, config))
        .map(|d| {
            ValidationError::at(
                d.way.element_url(),
                "way with oneway tag is traversed in wrong direction",
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::Tags;
    use std::sync::Arc;

    fn way(id: i64, tags: &[(&str, &str)]) -> Way {
        let tags: Tags = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Way::new(id, vec![1, 2], tags).unwrap()
    }

    fn directed(way: Way, traversal: Traversal) -> DirectedWay {
        DirectedWay::new(Arc::new(way), traversal)
    }

    #[test]
    fn tag_precedence() {
        assert_eq!(oneway_tag(&way(1, &[])), None);
        assert_eq!(oneway_tag(&way(1, &[("oneway", "yes")])), Some("yes"));
        assert_eq!(
            oneway_tag(&way(1, &[("oneway", "yes"), ("oneway:bus", "no")])),
            Some("no")
        );
        assert_eq!(
            oneway_tag(&way(
                1,
                &[("oneway", "yes"), ("oneway:bus", "no"), ("oneway:psv", "-1")]
            )),
            Some("-1")
        );
        assert_eq!(
            oneway_tag(&way(1, &[("junction", "roundabout")])),
            Some("yes")
        );
        assert_eq!(
            oneway_tag(&way(1, &[("junction", "roundabout"), ("oneway", "no")])),
            Some("no")
        );
    }

    #[test]
    fn forward_oneway() {
        let config = ValidationConfig::new();
        let w = way(1, &[("oneway", "yes")]);
        assert!(is_traversal_permitted(&w, Traversal::Forward, &config));
        assert!(is_traversal_permitted(&w, Traversal::Either, &config));
        assert!(!is_traversal_permitted(&w, Traversal::Reverse, &config));

        for value in ["true", "1"] {
            let w = way(1, &[("oneway", value)]);
            assert!(!is_traversal_permitted(&w, Traversal::Reverse, &config));
        }
    }

    #[test]
    fn reverse_oneway() {
        let config = ValidationConfig::new();
        for value in ["-1", "reverse"] {
            let w = way(1, &[("oneway", value)]);
            assert!(is_traversal_permitted(&w, Traversal::Reverse, &config));
            assert!(is_traversal_permitted(&w, Traversal::Either, &config));
            assert!(!is_traversal_permitted(&w, Traversal::Forward, &config));
        }
    }

    #[test]
    fn unrestricted_values() {
        let config = ValidationConfig::new();
        for value in ["no", "alternating", "reversible", "something_else"] {
            let w = way(1, &[("oneway", value)]);
            assert!(is_traversal_permitted(&w, Traversal::Forward, &config));
            assert!(is_traversal_permitted(&w, Traversal::Reverse, &config));
        }
    }

    #[test]
    fn bus_exemption() {
        let config = ValidationConfig::new();
        let w = way(1, &[("oneway", "yes"), ("oneway:bus", "no")]);
        assert!(is_traversal_permitted(&w, Traversal::Reverse, &config));
    }

    #[test]
    fn reversed_oneway_is_one_error() {
        let config = ValidationConfig::new();
        let ways = [
            directed(way(1, &[]), Traversal::Forward),
            directed(way(2, &[("oneway", "yes")]), Traversal::Reverse),
        ];
        let errors = check_oneway(&ways, &config);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "way with oneway tag is traversed in wrong direction"
        );
        assert_eq!(
            errors[0].url.as_deref(),
            Some("https://www.openstreetmap.org/way/2")
        );
    }

    #[test]
    fn caller_exceptions() {
        let config = ValidationConfig::new().with_ignored_ways([2]);
        let ways = [directed(way(2, &[("oneway", "yes")]), Traversal::Reverse)];
        assert!(check_oneway(&ways, &config).is_empty());
    }

    #[test]
    fn built_in_exceptions() {
        let config = ValidationConfig::new();
        let ways = [directed(
            way(61883421, &[("oneway", "yes")]),
            Traversal::Reverse,
        )];
        assert!(check_oneway(&ways, &config).is_empty());
    }

    #[test]
    fn unresolved_ways_are_skipped() {
        let config = ValidationConfig::new();
        let ways = [
            directed(way(1, &[("oneway", "yes")]), Traversal::Error),
            directed(way(2, &[("oneway", "-1")]), Traversal::Unresolved),
        ];
        assert!(check_oneway(&ways, &config).is_empty());
    }
}
