//! Lineage graph
//!
//! Directed, labeled edges between assets. Parallel edges and self-loops are
//! allowed. Queries are radius-1 only: [`LineageGraph::neighborhood`] returns
//! the asset, its direct upstream and downstream neighbors, and the edges
//! connecting them.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use core_kernel::{AssetId, LineageEdgeId};

use crate::asset::Asset;
use crate::error::CatalogError;
use crate::ports::CatalogPort;

/// Relation label used when none is given
pub const DEFAULT_RELATION: &str = "derives";

/// A stored lineage edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEdge {
    pub id: LineageEdgeId,
    pub source_id: AssetId,
    pub dest_id: AssetId,
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

impl LineageEdge {
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.dest_id
    }

    /// Returns true if the edge has `id` as either endpoint
    pub fn touches(&self, id: AssetId) -> bool {
        self.source_id == id || self.dest_id == id
    }
}

/// Edge data handed to the store for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineageEdge {
    pub source_id: AssetId,
    pub dest_id: AssetId,
    pub relation: String,
}

impl NewLineageEdge {
    pub fn new(source_id: AssetId, dest_id: AssetId, relation: impl Into<String>) -> Self {
        Self {
            source_id,
            dest_id,
            relation: relation.into(),
        }
    }
}

impl From<NewLineageEdge> for LineageEdge {
    fn from(edge: NewLineageEdge) -> Self {
        Self {
            id: LineageEdgeId::new_v7(),
            source_id: edge.source_id,
            dest_id: edge.dest_id,
            relation: edge.relation,
            created_at: Utc::now(),
        }
    }
}

/// Edge as rendered in a neighborhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: LineageEdgeId,
    pub source: AssetId,
    pub target: AssetId,
    pub relation: String,
}

impl From<&LineageEdge> for EdgeView {
    fn from(edge: &LineageEdge) -> Self {
        Self {
            id: edge.id,
            source: edge.source_id,
            target: edge.dest_id,
            relation: edge.relation.clone(),
        }
    }
}

/// Radius-1 view around one asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// The center asset and its direct neighbors, each once
    pub nodes: Vec<Asset>,
    /// Outgoing edges followed by incoming edges, each once
    pub edges: Vec<EdgeView>,
}

impl Neighborhood {
    /// Builds the view from the two edge scans and a node lookup.
    ///
    /// A self-loop shows up in both scans; it is kept at its outgoing
    /// position only.
    pub fn assemble(outgoing: &[LineageEdge], incoming: &[LineageEdge], nodes: Vec<Asset>) -> Self {
        let mut seen = HashSet::new();
        let edges = outgoing
            .iter()
            .chain(incoming.iter())
            .filter(|e| seen.insert(e.id))
            .map(EdgeView::from)
            .collect();

        Self { nodes, edges }
    }

    /// Ids the view needs nodes for: the center, every target of an
    /// outgoing edge and every source of an incoming edge
    pub fn node_ids(
        center: AssetId,
        outgoing: &[LineageEdge],
        incoming: &[LineageEdge],
    ) -> BTreeSet<AssetId> {
        std::iter::once(center)
            .chain(outgoing.iter().map(|e| e.dest_id))
            .chain(incoming.iter().map(|e| e.source_id))
            .collect()
    }

    pub fn contains_node(&self, id: AssetId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Lineage graph component
///
/// Stateless: holds only a store handle and re-derives every view from it.
#[derive(Clone)]
pub struct LineageGraph {
    port: Arc<dyn CatalogPort>,
}

impl LineageGraph {
    pub fn new(port: Arc<dyn CatalogPort>) -> Self {
        Self { port }
    }

    /// Creates a directed edge between two existing assets
    ///
    /// # Arguments
    ///
    /// * `source_id` - Upstream asset; required
    /// * `dest_id` - Downstream asset; required
    /// * `relation` - Label; `"derives"` when absent or blank
    ///
    /// # Errors
    ///
    /// * `CatalogError::Validation` if either id is missing
    /// * `CatalogError::NotFound` if either asset does not exist
    /// * `CatalogError::Store` if the store fails
    #[instrument(skip(self))]
    pub async fn create_edge(
        &self,
        source_id: Option<AssetId>,
        dest_id: Option<AssetId>,
        relation: Option<String>,
    ) -> Result<LineageEdgeId, CatalogError> {
        let (source_id, dest_id) = match (source_id, dest_id) {
            (Some(source), Some(dest)) => (source, dest),
            _ => {
                return Err(CatalogError::validation(
                    "src_asset_id and dst_asset_id are required",
                ))
            }
        };

        for id in [source_id, dest_id] {
            if !self.port.asset_exists(id).await? {
                debug!(asset_id = %id, "Edge endpoint does not exist");
                return Err(CatalogError::not_found("Asset", id));
            }
        }

        let relation = normalize_relation(relation);
        let edge = self
            .port
            .insert_edge(NewLineageEdge::new(source_id, dest_id, relation))
            .await?;

        info!(
            edge_id = %edge.id,
            source = %edge.source_id,
            target = %edge.dest_id,
            relation = %edge.relation,
            "Lineage edge created"
        );
        Ok(edge.id)
    }

    /// Returns the radius-1 neighborhood of an asset.
    ///
    /// The center is not checked for existence; an unknown asset yields an
    /// empty neighborhood.
    #[instrument(skip(self))]
    pub async fn neighborhood(&self, asset_id: AssetId) -> Result<Neighborhood, CatalogError> {
        let outgoing = self.port.find_edges_by_source(asset_id).await?;
        let incoming = self.port.find_edges_by_dest(asset_id).await?;

        let node_ids = Neighborhood::node_ids(asset_id, &outgoing, &incoming);
        let nodes = self.port.get_assets(node_ids.into_iter().collect()).await?;

        let view = Neighborhood::assemble(&outgoing, &incoming, nodes);
        debug!(
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            "Neighborhood computed"
        );
        Ok(view)
    }
}

fn normalize_relation(relation: Option<String>) -> String {
    match relation {
        Some(r) if !r.trim().is_empty() => r,
        _ => DEFAULT_RELATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: AssetId, dest: AssetId) -> LineageEdge {
        LineageEdge::from(NewLineageEdge::new(source, dest, DEFAULT_RELATION))
    }

    #[test]
    fn test_normalize_relation() {
        assert_eq!(normalize_relation(None), "derives");
        assert_eq!(normalize_relation(Some("  ".to_string())), "derives");
        assert_eq!(normalize_relation(Some("feeds".to_string())), "feeds");
    }

    #[test]
    fn test_node_ids_deduplicated() {
        let center = AssetId::new_v7();
        let other = AssetId::new_v7();
        let outgoing = vec![edge(center, other), edge(center, other)];
        let incoming = vec![edge(other, center)];

        let ids = Neighborhood::node_ids(center, &outgoing, &incoming);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&center));
        assert!(ids.contains(&other));
    }

    #[test]
    fn test_assemble_keeps_outgoing_first() {
        let center = AssetId::new_v7();
        let up = AssetId::new_v7();
        let down = AssetId::new_v7();
        let outgoing = vec![edge(center, down)];
        let incoming = vec![edge(up, center)];

        let view = Neighborhood::assemble(&outgoing, &incoming, vec![]);
        assert_eq!(view.edges.len(), 2);
        assert_eq!(view.edges[0].target, down);
        assert_eq!(view.edges[1].source, up);
    }

    #[test]
    fn test_assemble_self_loop_once() {
        let center = AssetId::new_v7();
        let looped = edge(center, center);
        assert!(looped.is_self_loop());

        let view = Neighborhood::assemble(&[looped.clone()], &[looped.clone()], vec![]);
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.edges[0].id, looped.id);
    }

    #[test]
    fn test_edge_view_serialization() {
        let e = edge(AssetId::new_v7(), AssetId::new_v7());
        let json = serde_json::to_value(EdgeView::from(&e)).unwrap();
        assert!(json.get("source").is_some());
        assert!(json.get("target").is_some());
        assert_eq!(json["relation"], "derives");
    }
}
