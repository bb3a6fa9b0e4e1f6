//! Path-order resolution.
//!
//! Walks the route ways in member order, checking that each one joins the
//! open end of the path so far and working out which way round it is
//! travelled. A way that joins at both of its ends is left unresolved and
//! settled afterwards from its successor, walking back from the end of the
//! route.

use std::collections::HashSet;
use std::sync::Arc;

use crate::osm::Way;

use super::error::ValidationError;

/// How a way is travelled along the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// First node to last node.
    Forward,
    /// Last node to first node.
    Reverse,
    /// Closed loop; entered and left at any node.
    Either,
    /// Ambiguous join, pending backward resolution.
    Unresolved,
    /// Could not be determined even after backward resolution.
    Error,
}

impl Traversal {
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            Traversal::Forward | Traversal::Reverse | Traversal::Either
        )
    }
}

/// A route way with its resolved traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedWay {
    pub way: Arc<Way>,
    pub traversal: Traversal,
}

impl DirectedWay {
    pub fn new(way: Arc<Way>, traversal: Traversal) -> Self {
        Self { way, traversal }
    }

    /// Node IDs in the order the route passes them.
    ///
    /// Only a reverse traversal flips the way; loops and unknowns keep the
    /// mapped order.
    pub fn nodes_in_travel_order(&self) -> Vec<i64> {
        let nodes = self.way.nodes();
        match self.traversal {
            Traversal::Reverse => nodes.iter().rev().copied().collect(),
            _ => nodes.to_vec(),
        }
    }
}

/// Result of resolving the way order of a route.
#[derive(Debug, Clone, Default)]
pub struct WayOrder {
    /// Ways in member order, annotated with their traversal.
    pub ways: Vec<DirectedWay>,
    /// Whether some way did not join the path before it.
    pub has_gap: bool,
    /// Ordering findings.
    pub errors: Vec<ValidationError>,
}

impl WayOrder {
    /// Whether every way has a known traversal.
    pub fn is_fully_resolved(&self) -> bool {
        self.ways.iter().all(|d| d.traversal.is_resolved())
    }
}

/// Outcome of trying to attach a way to the open ends of the path.
struct Join {
    matches: usize,
    traversal: Traversal,
    next: HashSet<i64>,
}

/// Resolve the order and traversal of a route's ways.
///
/// If any way fails to join, the result has `has_gap` set and traversals are
/// left as found by the forward walk: with a broken path there is no single
/// direction to check against.
pub fn resolve_way_order(ways: &[Arc<Way>]) -> WayOrder {
    let mut order = WayOrder::default();
    let mut allowed: HashSet<i64> = HashSet::new();

    for (idx, way) in ways.iter().enumerate() {
        if idx == 0 {
            allowed = open_ends(way);
            let traversal = if way.is_circular() {
                Traversal::Either
            } else {
                Traversal::Unresolved
            };
            order.ways.push(DirectedWay::new(way.clone(), traversal));
            continue;
        }

        let join = join(way, &allowed);
        let traversal = match join.matches {
            0 => {
                order.errors.push(ValidationError::at(
                    way.element_url(),
                    "ways are incorrectly ordered",
                ));
                order.has_gap = true;
                // The path restarts somewhere on this way; where is unknown.
                allowed = way.nodes().iter().copied().collect();
                Traversal::Unresolved
            }
            1 => {
                allowed = join.next;
                join.traversal
            }
            _ => {
                allowed = join.next;
                if way.is_circular() {
                    Traversal::Either
                } else {
                    Traversal::Unresolved
                }
            }
        };
        order.ways.push(DirectedWay::new(way.clone(), traversal));
    }

    if order.has_gap {
        return order;
    }

    order.ways = resolve_backwards(order.ways);
    for directed in &order.ways {
        if directed.traversal == Traversal::Error {
            order.errors.push(ValidationError::at(
                directed.way.element_url(),
                "unable to determine way traversal direction",
            ));
        }
    }

    order
}

/// Nodes at which the path is open after passing `way` with no known entry.
fn open_ends(way: &Way) -> HashSet<i64> {
    if way.is_circular() {
        way.nodes().iter().copied().collect()
    } else {
        HashSet::from([way.first_node(), way.last_node()])
    }
}

fn join(way: &Way, allowed: &HashSet<i64>) -> Join {
    if way.is_circular() {
        let nodes: HashSet<i64> = way.nodes().iter().copied().collect();
        let matches = allowed.iter().filter(|n| nodes.contains(n)).count();
        return Join {
            matches,
            traversal: Traversal::Either,
            next: if matches > 0 { nodes } else { HashSet::new() },
        };
    }

    let mut join = Join {
        matches: 0,
        traversal: Traversal::Unresolved,
        next: HashSet::new(),
    };
    if allowed.contains(&way.first_node()) {
        join.matches += 1;
        join.traversal = Traversal::Forward;
        join.next.insert(way.last_node());
    }
    if allowed.contains(&way.last_node()) {
        join.matches += 1;
        join.traversal = Traversal::Reverse;
        join.next.insert(way.first_node());
    }
    join
}

/// Settle unresolved ways from their successors, last to first.
///
/// The final way has no successor, so it is settled from its predecessor
/// instead. A lone way constrains nothing and is treated as a loop.
fn resolve_backwards(mut ways: Vec<DirectedWay>) -> Vec<DirectedWay> {
    let len = ways.len();
    if len == 1 {
        if ways[0].traversal == Traversal::Unresolved {
            ways[0].traversal = Traversal::Either;
        }
        return ways;
    }

    for i in (0..len).rev() {
        if ways[i].traversal != Traversal::Unresolved {
            continue;
        }
        ways[i].traversal = if i + 1 < len {
            from_successor(&ways[i + 1], &ways[i].way)
        } else {
            from_predecessor(&ways[i - 1], &ways[i].way)
        };
    }

    ways
}

/// Traversal of `way` given the way travelled immediately after it.
fn from_successor(next: &DirectedWay, way: &Way) -> Traversal {
    if next.way.is_circular() && next.traversal.is_resolved() {
        for &node in next.way.nodes() {
            if node == way.first_node() {
                return Traversal::Reverse;
            }
            if node == way.last_node() {
                return Traversal::Forward;
            }
        }
        return Traversal::Error;
    }

    let entry = match next.traversal {
        Traversal::Forward => next.way.first_node(),
        Traversal::Reverse => next.way.last_node(),
        _ => return Traversal::Error,
    };

    if way.last_node() == entry {
        Traversal::Forward
    } else if way.first_node() == entry {
        Traversal::Reverse
    } else {
        Traversal::Error
    }
}

/// Traversal of the final `way` given the way travelled immediately before it.
fn from_predecessor(prev: &DirectedWay, way: &Way) -> Traversal {
    let exits: HashSet<i64> = match prev.traversal {
        Traversal::Forward => HashSet::from([prev.way.last_node()]),
        Traversal::Reverse => HashSet::from([prev.way.first_node()]),
        Traversal::Either => prev.way.nodes().iter().copied().collect(),
        Traversal::Unresolved | Traversal::Error => return Traversal::Error,
    };

    if exits.contains(&way.first_node()) {
        Traversal::Forward
    } else if exits.contains(&way.last_node()) {
        Traversal::Reverse
    } else {
        Traversal::Error
    }
}
