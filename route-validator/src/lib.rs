//! Public transport route validator for OpenStreetMap.
//!
//! Checks bus route relations (and the route masters that group them)
//! against the PTv2 tagging scheme: relation tags, member order, stop and
//! platform nodes, way continuity, one-way restrictions and stop order.

pub mod notify;
pub mod osm;
pub mod routes;
pub mod validation;
