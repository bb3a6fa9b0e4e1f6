//! Validation passes over route and route master relations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::osm::{
    CachedSource, DEFAULT_PARALLEL_REQUESTS, ElementSource, ElementType, Node, Relation, Way,
    first_failure,
};

use super::config::ValidationConfig;
use super::error::ValidateError;
use super::members::{check_node_member_count, validate_member_order};
use super::nodes::validate_member_nodes;
use super::oneway::check_oneway;
use super::report::{GroupReport, Outcome, RelationKind, RelationReport, Validation};
use super::route_master::validate_route_master;
use super::stop_order::check_stop_order;
use super::tags::{check_ptv2, validate_route_tags};
use super::way_order::resolve_way_order;

/// Validates relations fetched from an [`ElementSource`].
///
/// Each route pass gets its own element cache, so one validator can be
/// reused across relations without serving stale ways or nodes.
pub struct Validator<'a, S> {
    source: &'a S,
    config: ValidationConfig,
    parallel: usize,
    cancel: CancellationToken,
}

impl<'a, S: ElementSource> Validator<'a, S> {
    pub fn new(source: &'a S, config: ValidationConfig) -> Self {
        Self {
            source,
            config,
            parallel: DEFAULT_PARALLEL_REQUESTS,
            cancel: CancellationToken::new(),
        }
    }

    /// Maximum in-flight element fetches per batch.
    pub fn with_parallel_requests(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Abandon in-flight work when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Fetch a route relation and validate it.
    pub async fn validate_route(&self, id: i64) -> Result<Outcome, ValidateError> {
        match self.fetch_relation(id).await? {
            Some(relation) => Ok(Outcome::Checked(
                self.validate_route_relation(&relation).await?,
            )),
            None => Ok(Outcome::Gone { relation_id: id }),
        }
    }

    /// Fetch a route master, check it, then validate each variant as a route.
    pub async fn validate_route_group(&self, id: i64) -> Result<GroupReport, ValidateError> {
        match self.fetch_relation(id).await? {
            Some(relation) => Ok(self.validate_group_relation(&relation).await),
            None => Ok(GroupReport {
                group: Outcome::Gone { relation_id: id },
                variants: Vec::new(),
            }),
        }
    }

    /// Fetch a relation and validate it according to its `type` tag.
    pub async fn validate_relation(&self, id: i64) -> Result<Validation, ValidateError> {
        let Some(relation) = self.fetch_relation(id).await? else {
            return Ok(Validation::Gone { relation_id: id });
        };

        match relation.relation_type() {
            Some("route") => Ok(Validation::Route(
                self.validate_route_relation(&relation).await?,
            )),
            Some("route_master") => Ok(Validation::RouteMaster(
                self.validate_group_relation(&relation).await,
            )),
            other => Err(ValidateError::UnsupportedType {
                id,
                relation_type: other.map(str::to_owned),
            }),
        }
    }

    /// Run the full route pass over an already-fetched relation.
    pub async fn validate_route_relation(
        &self,
        relation: &Relation,
    ) -> Result<RelationReport, ValidateError> {
        let mut report = RelationReport {
            relation_id: relation.id,
            name: relation.name().map(str::to_owned),
            kind: RelationKind::Route,
            findings: Vec::new(),
            sub_relations: Vec::new(),
        };

        if let Some(finding) = check_ptv2(relation) {
            info!(relation_id = relation.id, "relation is not PTv2, skipping checks");
            report.findings.push(finding);
            return Ok(report);
        }

        let findings = &mut report.findings;
        findings.extend(validate_route_tags(relation));
        findings.extend(validate_member_order(relation));

        let source = CachedSource::new(self.source);

        let nodes = self.load_member_nodes(&source, relation).await?;
        findings.extend(validate_member_nodes(relation, &nodes, &self.config));

        let ways = self.load_route_ways(&source, relation).await?;
        let mut order = resolve_way_order(&ways);
        findings.extend(order.errors.drain(..));

        if order.has_gap {
            debug!(
                relation_id = relation.id,
                "route has gaps, skipping direction and stop order checks"
            );
        } else {
            findings.extend(check_oneway(&order.ways, &self.config));
            if order.is_fully_resolved() {
                findings.extend(check_stop_order(&order.ways, relation));
            } else {
                debug!(
                    relation_id = relation.id,
                    "way directions unresolved, skipping stop order check"
                );
            }
        }

        findings.extend(check_node_member_count(relation, &self.config));

        info!(
            relation_id = relation.id,
            findings = report.findings.len(),
            "validated route"
        );
        Ok(report)
    }

    /// Check a route master's own tags and members. Variants are not visited.
    pub fn check_route_master(&self, relation: &Relation) -> RelationReport {
        RelationReport {
            relation_id: relation.id,
            name: relation.name().map(str::to_owned),
            kind: RelationKind::RouteMaster,
            findings: validate_route_master(relation, &self.config),
            sub_relations: relation.sub_relation_ids(),
        }
    }

    async fn validate_group_relation(&self, relation: &Relation) -> GroupReport {
        let report = self.check_route_master(relation);
        info!(
            relation_id = relation.id,
            findings = report.findings.len(),
            variants = report.sub_relations.len(),
            "validated route master"
        );

        let mut variants = Vec::with_capacity(report.sub_relations.len());
        for &variant in &report.sub_relations {
            let result = self.validate_route(variant).await;
            if let Err(e) = &result {
                warn!(relation_id = variant, error = %e, "failed to validate route variant");
            }
            variants.push((variant, result));
        }

        GroupReport {
            group: Outcome::Checked(report),
            variants,
        }
    }

    /// Relations that list `id` as a member, such as the route masters of a route.
    pub async fn parent_relations(&self, id: i64) -> Result<Vec<Relation>, ValidateError> {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ValidateError::Cancelled),
            result = self.source.get_parent_relations(id) => result,
        };
        result.map_err(|e| ValidateError::fetch(id, e))
    }

    /// Fetch the subject relation. `None` means it has been deleted.
    async fn fetch_relation(&self, id: i64) -> Result<Option<Relation>, ValidateError> {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ValidateError::Cancelled),
            result = self.source.get_relation(id) => result,
        };

        match result {
            Ok(relation) => Ok(Some(relation)),
            Err(e) if e.is_gone() => {
                info!(relation_id = id, "relation no longer exists");
                Ok(None)
            }
            Err(e) => Err(ValidateError::fetch(id, e)),
        }
    }

    async fn load_member_nodes(
        &self,
        source: &CachedSource<'_, S>,
        relation: &Relation,
    ) -> Result<HashMap<i64, Arc<Node>>, ValidateError> {
        let ids: Vec<i64> = relation
            .members
            .iter()
            .filter(|m| m.kind == ElementType::Node)
            .map(|m| m.reference)
            .collect();

        debug!(relation_id = relation.id, count = ids.len(), "loading node members");
        let loaded = source
            .load_nodes(&ids, self.parallel, &self.cancel)
            .await
            .map_err(|e| ValidateError::fetch(relation.id, e))?;

        if let Some((id, e)) = first_failure(&loaded, &ids) {
            return Err(ValidateError::member(ElementType::Node, id, e));
        }

        Ok(loaded
            .into_iter()
            .filter_map(|(id, node)| node.ok().map(|node| (id, node)))
            .collect())
    }

    /// Route ways in member order, repeats included.
    async fn load_route_ways(
        &self,
        source: &CachedSource<'_, S>,
        relation: &Relation,
    ) -> Result<Vec<Arc<Way>>, ValidateError> {
        let ids: Vec<i64> = relation
            .members
            .iter()
            .filter(|m| m.is_route_way())
            .map(|m| m.reference)
            .collect();

        debug!(relation_id = relation.id, count = ids.len(), "loading route ways");
        let loaded = source
            .load_ways(&ids, self.parallel, &self.cancel)
            .await
            .map_err(|e| ValidateError::fetch(relation.id, e))?;

        if let Some((id, e)) = first_failure(&loaded, &ids) {
            return Err(ValidateError::member(ElementType::Way, id, e));
        }

        ids.iter()
            .map(|id| match loaded.get(id) {
                Some(Ok(way)) => Ok(way.clone()),
                _ => Err(ValidateError::LoadFailed {
                    kind: ElementType::Way,
                    id: *id,
                }),
            })
            .collect()
    }
}
