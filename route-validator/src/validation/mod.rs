//! Bus route validation.
//!
//! A route relation is checked in one pass: relation tags, member order and
//! roles, stop and platform nodes, then the ways. The ways are joined into
//! a path and each is given a direction of travel; one-way restrictions and
//! stop order are checked against that path. Findings are collected into a
//! [`RelationReport`]; only a failure to load data aborts the pass.
//!
//! Route masters get a lighter pass over their own tags and members, and
//! each variant is then validated as a route.

mod config;
mod error;
mod members;
mod nodes;
mod oneway;
mod report;
mod route_master;
mod stop_order;
mod tags;
mod validator;
mod way_order;

pub use config::ValidationConfig;
pub use error::{ValidateError, ValidationError};
pub use members::{check_node_member_count, validate_member_order};
pub use nodes::{validate_member_nodes, validate_platform_node, validate_stop_node};
pub use oneway::{check_oneway, is_traversal_permitted, oneway_tag};
pub use report::{GroupReport, Outcome, RelationKind, RelationReport, Validation};
pub use route_master::validate_route_master;
pub use stop_order::check_stop_order;
pub use tags::{Taggable, check_ptv2, check_tag_value, check_tags_present, validate_route_tags};
pub use validator::Validator;
pub use way_order::{DirectedWay, Traversal, WayOrder, resolve_way_order};
