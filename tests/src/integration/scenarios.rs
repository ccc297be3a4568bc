//! # Reference Scenarios
//!
//! 1. **Single materialized route**: one crawled node, one dangling peer.
//! 2. **Missing registration**: a default-only route is implicitly blocked.
//! 3. **Shared policy**: identical DVN sets form the dominant combination,
//!    with or without a reported library status.
//! 4. **Hub and spokes**: the odd override is the only differing edge.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use oapp_01_config_resolver::{ResolveInput, RouteResolver, SecurityConfigResolver};
    use oapp_02_security_crawler::{CrawlOptions, MockBatchLoader, SecurityCrawler};
    use oapp_03_graph_analyzer::{DifferenceReason, GraphAnalysis, GraphAnalysisApi, GraphAnalyzer};
    use shared_types::{
        edge_key, AnalyzerConfig, ConfigBatch, CrawlConfig, LayoutConfig, LibraryStatus, OAppId,
        PeerStateHint, ResolverConfig, SecurityConfigRow, SourceType, UlnConfigRow, ZERO_ADDRESS,
    };

    use crate::fixtures::{mesh, peer_record, DVN_HORIZEN, DVN_LZ, DVN_NETHERMIND, LIBRARY};

    const SEED: &str = "30101_0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111";
    const PEER: &str = "30102_0x0000000000000000000000000000000000002222";

    fn crawler(batch: ConfigBatch, resolver: ResolverConfig) -> SecurityCrawler {
        SecurityCrawler::new(
            Arc::new(MockBatchLoader::new(batch)),
            resolver,
            CrawlConfig::default(),
        )
    }

    // =========================================================================
    // SCENARIO 1: single materialized route
    // =========================================================================

    #[tokio::test]
    async fn test_single_materialized_route() {
        let mut batch = ConfigBatch::default();
        batch.origin.insert(
            SEED.to_string(),
            vec![SecurityConfigRow {
                eid: "30102".to_string(),
                effective_receive_library: Some(LIBRARY.to_string()),
                required_dvn_count: Some(2),
                required_dvns: vec![DVN_LZ.to_string(), DVN_NETHERMIND.to_string()],
                library_status: Some(LibraryStatus::Tracked),
                peer: Some(
                    "0x0000000000000000000000000000000000000000000000000000000000002222"
                        .to_string(),
                ),
                ..Default::default()
            }],
        );

        let result = crawler(batch, ResolverConfig::default())
            .crawl(SEED, CrawlOptions::with_depth(1), |_| {})
            .await
            .unwrap();

        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.edges.len(), 1);
        assert!(result.node(PEER).unwrap().is_dangling);

        let edge = &result.edges[0];
        assert_eq!(edge.from, PEER);
        assert_eq!(edge.to, SEED);

        let analysis = GraphAnalyzer::default().analyze(&result);
        assert!(!analysis.edges[&edge_key(PEER, SEED)].is_blocked);
    }

    // =========================================================================
    // SCENARIO 2: missing registration
    // =========================================================================

    #[test]
    fn test_default_only_route_is_implicitly_blocked() {
        let mut batch = ConfigBatch::default();
        batch.default_configs.insert(
            "30101".to_string(),
            vec![UlnConfigRow {
                eid: "30110".to_string(),
                confirmations: Some(20),
                required_dvn_count: Some(1),
                required_dvns: vec![DVN_LZ.to_string()],
                ..Default::default()
            }],
        );

        let oapp = OAppId::parse(SEED).unwrap();
        let resolved = SecurityConfigResolver::default()
            .resolve(&ResolveInput::from_batch(&batch, &oapp, SEED));

        assert_eq!(resolved.rows.len(), 1);
        let row = &resolved.rows[0];
        assert_eq!(row.source_endpoint_id, "30110");
        assert_eq!(row.peer_state_hint, PeerStateHint::ImplicitBlocked);
        assert_eq!(row.peer.as_deref(), Some(ZERO_ADDRESS));
        assert_eq!(row.source_type, SourceType::DefaultDerived);
        assert!(row.synthetic);
        assert_eq!(resolved.summary.implicit_blocks, 1);
    }

    // =========================================================================
    // SCENARIO 3: shared policy
    // =========================================================================

    async fn shared_policy(library_status: Option<LibraryStatus>) -> GraphAnalysis {
        let route = |eid: &str, peer: &str| SecurityConfigRow {
            eid: eid.to_string(),
            effective_receive_library: Some(LIBRARY.to_string()),
            required_dvn_count: Some(2),
            required_dvns: vec![DVN_LZ.to_string(), DVN_NETHERMIND.to_string()],
            library_status,
            peer: Some(peer.to_string()),
            ..Default::default()
        };
        let mut batch = ConfigBatch::default();
        batch
            .origin
            .insert(SEED.to_string(), vec![route("30102", "0x2222")]);
        batch.origin.insert(
            PEER.to_string(),
            vec![route("30101", "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111")],
        );

        let result = crawler(batch, ResolverConfig::default())
            .crawl(SEED, CrawlOptions::with_depth(2), |_| {})
            .await
            .unwrap();
        assert_eq!(result.edges.len(), 2);

        GraphAnalyzer::default().analyze(&result)
    }

    #[tokio::test]
    async fn test_shared_policy_is_dominant() {
        let analysis = shared_policy(Some(LibraryStatus::Tracked)).await;
        let dominant = analysis.dominant.unwrap();
        assert_eq!(dominant.count, 2);
        assert_eq!(dominant.share, 1.0);
        assert!(dominant.to_nodes.contains(SEED));
        assert!(dominant.to_nodes.contains(PEER));
        assert_eq!(analysis.summary.differing_edges, 0);
    }

    #[tokio::test]
    async fn test_shared_policy_without_library_status() {
        let analysis = shared_policy(None).await;
        assert_eq!(analysis.summary.blocked_edges, 0);
        let dominant = analysis.dominant.unwrap();
        assert_eq!(dominant.count, 2);
        assert!(dominant.to_nodes.contains(SEED));
        assert!(dominant.to_nodes.contains(PEER));
    }

    // =========================================================================
    // SCENARIO 4: hub and spokes
    // =========================================================================

    #[tokio::test]
    async fn test_hub_and_spokes() {
        let m = mesh(4);
        let result = crawler(m.batch.clone(), m.resolver.clone())
            .crawl(&m.hub, CrawlOptions::with_depth(2), |_| {})
            .await
            .unwrap();

        assert!(result.is_complete());
        assert_eq!(result.nodes.len(), 5);
        assert!(result.nodes.iter().all(|n| !n.is_dangling));
        assert_eq!(result.edges.len(), 8);
        assert!(result.edges.iter().all(|e| e.is_stale_peer == Some(false)));

        let analysis = GraphAnalyzer::default().analyze(&result);
        let dominant = analysis.dominant.as_ref().unwrap();
        assert_eq!(dominant.count, 7);
        assert_eq!(dominant.required_dvn_count, Some(2));
        assert_eq!(analysis.summary.differing_edges, 1);
        assert!(analysis.blocked_nodes.is_empty());

        let odd = &analysis.edges[&edge_key(&m.spokes[0], &m.hub)];
        assert!(odd.differs_from_popular);
        assert!(odd.difference_reasons.iter().any(|r| matches!(
            r,
            DifferenceReason::ValidatorSetMismatch { missing, extra }
                if missing == &vec![DVN_NETHERMIND.to_string()]
                    && extra == &vec![DVN_HORIZEN.to_string()]
        )));
    }

    #[tokio::test]
    async fn test_alias_collapses_operator_deployments() {
        let m = mesh(4);
        let result = crawler(m.batch.clone(), m.resolver.clone())
            .crawl(&m.hub, CrawlOptions::with_depth(2), |_| {})
            .await
            .unwrap();

        let analyzer = GraphAnalyzer::new(
            AnalyzerConfig::default()
                .with_alias(DVN_NETHERMIND, "Partner")
                .with_alias(DVN_HORIZEN, "Partner"),
            LayoutConfig::default(),
        );
        let analysis = analyzer.analyze(&result);
        assert_eq!(analysis.dominant.unwrap().count, 8);
        assert_eq!(analysis.summary.differing_edges, 0);
    }

    #[tokio::test]
    async fn test_zeroed_spoke_blocks_route() {
        let mut m = mesh(3);
        // Hub zeroes its peer for the second spoke.
        let eid = 30103;
        let hub_peers = m.batch.peer_records_by_oapp.get_mut(&m.hub).unwrap();
        hub_peers.retain(|p| p.eid != eid.to_string());
        hub_peers.push(peer_record(&m.hub, eid, ZERO_ADDRESS));

        let result = crawler(m.batch.clone(), m.resolver.clone())
            .crawl(&m.hub, CrawlOptions::with_depth(2), |_| {})
            .await
            .unwrap();

        // The zeroed spoke is never reached through the hub.
        assert!(result.node(&m.spokes[1]).is_none());
        let zero = format!("{}_{}", eid, ZERO_ADDRESS);
        assert!(result.node(&zero).unwrap().is_dangling);

        let analysis = GraphAnalyzer::default().analyze(&result);
        assert!(analysis.edges[&edge_key(&zero, &m.hub)].is_blocked);
        assert_eq!(analysis.summary.blocked_edges, 1);
    }
}
