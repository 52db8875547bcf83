//! Tests for the lineage graph component

use std::sync::Arc;

use proptest::prelude::*;

use core_kernel::AssetId;
use domain_catalog::{
    Asset, AssetType, CatalogError, CatalogPort, InMemoryCatalogPort, LineageGraph,
};

async fn seeded(names: &[&str]) -> (Arc<InMemoryCatalogPort>, Vec<Asset>) {
    let assets: Vec<Asset> = names
        .iter()
        .map(|n| Asset::new(*n, AssetType::Policy))
        .collect();
    let port = Arc::new(InMemoryCatalogPort::with_assets(assets.clone()).await);
    (port, assets)
}

// ============================================================================
// create_edge
// ============================================================================

mod create_edge_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_edge_between_existing_assets() {
        let (port, assets) = seeded(&["Policy_Master", "Claim_Intake_2025"]).await;
        let graph = LineageGraph::new(port.clone());

        let edge_id = graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), Some("feeds".to_string()))
            .await
            .unwrap();

        let outgoing = port.find_edges_by_source(assets[0].id).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].id, edge_id);
        assert_eq!(outgoing[0].relation, "feeds");
    }

    #[tokio::test]
    async fn test_create_edge_defaults_relation() {
        let (port, assets) = seeded(&["A", "B"]).await;
        let graph = LineageGraph::new(port.clone());

        graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap();

        let edges = port.find_edges_by_dest(assets[1].id).await.unwrap();
        assert_eq!(edges[0].relation, "derives");
    }

    #[tokio::test]
    async fn test_create_edge_missing_source_is_validation_error() {
        let (port, assets) = seeded(&["A"]).await;
        let graph = LineageGraph::new(port.clone());

        let err = graph
            .create_edge(None, Some(assets[0].id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = graph
            .create_edge(Some(assets[0].id), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(port.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_edge_unknown_destination_is_not_found() {
        let (port, assets) = seeded(&["A"]).await;
        let graph = LineageGraph::new(port.clone());

        let err = graph
            .create_edge(Some(assets[0].id), Some(AssetId::new_v7()), None)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(port.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_edge_against_deleted_asset() {
        let (port, assets) = seeded(&["A", "B"]).await;
        let graph = LineageGraph::new(port.clone());
        port.delete_asset(assets[1].id).await.unwrap();

        let err = graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_parallel_edges_are_kept() {
        let (port, assets) = seeded(&["A", "B"]).await;
        let graph = LineageGraph::new(port.clone());

        let first = graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap();
        let second = graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(port.edge_count().await, 2);
    }
}

// ============================================================================
// neighborhood
// ============================================================================

mod neighborhood_tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_chain_neighborhood() {
        let (port, assets) = seeded(&["Policy_Master", "Claim_Intake_2025", "Reserve_Model_v1"]).await;
        let graph = LineageGraph::new(port.clone());
        let (policy, claim, reserve) = (&assets[0], &assets[1], &assets[2]);

        graph
            .create_edge(Some(policy.id), Some(claim.id), Some("feeds".into()))
            .await
            .unwrap();
        graph
            .create_edge(Some(claim.id), Some(reserve.id), Some("drives".into()))
            .await
            .unwrap();

        let view = graph.neighborhood(claim.id).await.unwrap();
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.edges.len(), 2);
        // Outgoing first, then incoming
        assert_eq!(view.edges[0].relation, "drives");
        assert_eq!(view.edges[0].target, reserve.id);
        assert_eq!(view.edges[1].relation, "feeds");
        assert_eq!(view.edges[1].source, policy.id);

        let view = graph.neighborhood(policy.id).await.unwrap();
        assert_eq!(view.nodes.len(), 2);
        assert!(!view.contains_node(reserve.id));
        assert_eq!(view.edges.len(), 1);
    }

    #[tokio::test]
    async fn test_edge_visible_from_both_endpoints_once() {
        let (port, assets) = seeded(&["A", "B"]).await;
        let graph = LineageGraph::new(port.clone());

        let edge_id = graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap();

        for center in [assets[0].id, assets[1].id] {
            let view = graph.neighborhood(center).await.unwrap();
            let count = view.edges.iter().filter(|e| e.id == edge_id).count();
            assert_eq!(count, 1);
        }
    }

    #[tokio::test]
    async fn test_self_loop_reported_once() {
        let (port, assets) = seeded(&["A"]).await;
        let graph = LineageGraph::new(port.clone());

        graph
            .create_edge(Some(assets[0].id), Some(assets[0].id), Some("refreshes".into()))
            .await
            .unwrap();

        let view = graph.neighborhood(assets[0].id).await.unwrap();
        assert_eq!(view.nodes.len(), 1);
        assert_eq!(view.edges.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_center_is_empty() {
        let (port, _) = seeded(&["A"]).await;
        let graph = LineageGraph::new(port);

        let view = graph.neighborhood(AssetId::new_v7()).await.unwrap();
        assert!(view.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_asset_removes_its_edges() {
        let (port, assets) = seeded(&["A", "B", "C"]).await;
        let graph = LineageGraph::new(port.clone());

        graph.create_edge(Some(assets[0].id), Some(assets[1].id), None).await.unwrap();
        graph.create_edge(Some(assets[1].id), Some(assets[2].id), None).await.unwrap();

        port.delete_asset(assets[1].id).await.unwrap();

        let view = graph.neighborhood(assets[0].id).await.unwrap();
        assert!(view.edges.is_empty());
        assert_eq!(view.nodes.len(), 1);
    }

    #[tokio::test]
    async fn test_neighborhood_serializes_like_the_catalog_api() {
        let (port, assets) = seeded(&["A", "B"]).await;
        let graph = LineageGraph::new(port);
        graph
            .create_edge(Some(assets[0].id), Some(assets[1].id), None)
            .await
            .unwrap();

        let json = serde_json::to_value(graph.neighborhood(assets[0].id).await.unwrap()).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"][0]["relation"], "derives");
        assert_eq!(json["nodes"][0]["type"], "policy");
    }
}

// ============================================================================
// Concurrent edge creation and asset deletion
// ============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_deletes_racing_edge_inserts_leave_no_dangling_edges() {
        let names: Vec<String> = (0..12).map(|i| format!("Asset_{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (port, assets) = seeded(&refs).await;
        let graph = LineageGraph::new(port.clone());

        let mut tasks = tokio::task::JoinSet::new();
        for (i, asset) in assets.iter().enumerate() {
            for offset in 1..4 {
                let graph = graph.clone();
                let source = asset.id;
                let dest = assets[(i + offset) % assets.len()].id;
                tasks.spawn(async move {
                    match graph.create_edge(Some(source), Some(dest), None).await {
                        Ok(_) => {}
                        Err(e) => assert!(e.is_not_found(), "unexpected error: {e}"),
                    }
                });
            }
            // Odd assets are deleted while edges to them are being created
            if i % 2 == 1 {
                let port = port.clone();
                let victim = asset.id;
                tasks.spawn(async move {
                    port.delete_asset(victim).await.unwrap();
                });
            }
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        let mut stored = Vec::new();
        for asset in &assets {
            stored.extend(port.find_edges_by_source(asset.id).await.unwrap());
        }
        assert_eq!(stored.len(), port.edge_count().await);
        for edge in &stored {
            assert!(port.asset_exists(edge.source_id).await.unwrap(), "dangling source");
            assert!(port.asset_exists(edge.dest_id).await.unwrap(), "dangling dest");
        }

        // Only the even-to-even edges (offset 2) survive
        assert_eq!(stored.len(), assets.len() / 2);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_neighborhood_edges_touch_center(
        edges in proptest::collection::vec((0usize..6, 0usize..6), 0..20),
        center in 0usize..6,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (port, assets) = seeded(&["A", "B", "C", "D", "E", "F"]).await;
            let graph = LineageGraph::new(port);

            for (s, d) in &edges {
                graph
                    .create_edge(Some(assets[*s].id), Some(assets[*d].id), None)
                    .await
                    .unwrap();
            }

            let center_id = assets[center].id;
            let view = graph.neighborhood(center_id).await.unwrap();

            let touching = edges.iter().filter(|(s, d)| *s == center || *d == center).count();
            assert_eq!(view.edges.len(), touching);
            for edge in &view.edges {
                assert!(edge.source == center_id || edge.target == center_id);
                assert!(view.contains_node(edge.source));
                assert!(view.contains_node(edge.target));
            }
            assert!(view.contains_node(center_id));
        });
    }
}
