//! Stop order along the resolved path.

use std::collections::HashMap;

use crate::osm::{ElementType, Member, Relation};

use super::error::ValidationError;
use super::way_order::DirectedWay;

/// Check that stop positions occur along the route in member order.
///
/// The ways are flattened into the sequence of nodes the bus passes. Each
/// stop must appear strictly after the previous stop; the earliest such
/// occurrence is taken, so a node passed twice on a loop can match on
/// either pass.
pub fn check_stop_order(ways: &[DirectedWay], relation: &Relation) -> Vec<ValidationError> {
    let stops: Vec<&Member> = relation
        .members
        .iter()
        .filter(|m| m.kind == ElementType::Node && m.is_stop())
        .collect();

    if stops.len() < 2 {
        return Vec::new();
    }

    let mut positions: HashMap<i64, Vec<usize>> =
        stops.iter().map(|s| (s.reference, Vec::new())).collect();

    let path = ways.iter().flat_map(DirectedWay::nodes_in_travel_order);
    for (idx, node) in path.enumerate() {
        if let Some(indices) = positions.get_mut(&node) {
            indices.push(idx);
        }
    }

    let mut errors = Vec::new();
    let mut cursor: Option<usize> = None;

    for stop in stops {
        let indices = &positions[&stop.reference];
        if indices.is_empty() {
            errors.push(ValidationError::at(
                stop.element_url(),
                "stop is not on route",
            ));
            continue;
        }

        // Indices are ascending, so the first past the cursor is the smallest.
        match indices.iter().find(|&&i| cursor.is_none_or(|c| i > c)) {
            Some(&next) => cursor = Some(next),
            None => errors.push(ValidationError::at(
                stop.element_url(),
                "stop is incorrectly ordered",
            )),
        }
    }

    errors
}
