//! # Crawl Pipeline
//!
//! Crawl, persist, reload and analyze; checks the properties callers rely on
//! regardless of the graph's shape.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use oapp_02_security_crawler::{
        load_crawl, save_crawl, CancelFlag, CrawlError, CrawlOptions, DefaultConfigDirectory,
        MockBatchLoader, SecurityCrawler, SnapshotBatchLoader,
    };
    use oapp_03_graph_analyzer::{GraphAnalysisApi, GraphAnalyzer};
    use shared_types::{CrawlConfig, CrawlResult, SecurityConfigRow};
    use tempfile::tempdir;

    use crate::fixtures::{chain, mesh, Mesh};

    fn crawler_for(m: &Mesh, loader: MockBatchLoader, config: CrawlConfig) -> SecurityCrawler {
        SecurityCrawler::new(Arc::new(loader), m.resolver.clone(), config)
    }

    async fn crawl_mesh(m: &Mesh, depth: u32) -> CrawlResult {
        crawler_for(m, MockBatchLoader::new(m.batch.clone()), CrawlConfig::default())
            .crawl(&m.hub, CrawlOptions::with_depth(depth), |_| {})
            .await
            .unwrap()
    }

    fn assert_closed(result: &CrawlResult) {
        let ids: BTreeSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &result.edges {
            assert!(ids.contains(edge.from.as_str()), "missing node {}", edge.from);
            assert!(ids.contains(edge.to.as_str()), "missing node {}", edge.to);
        }
    }

    #[tokio::test]
    async fn test_every_edge_endpoint_is_a_node() {
        let m = mesh(5);
        for depth in [0, 1, 2, 3] {
            assert_closed(&crawl_mesh(&m, depth).await);
        }

        let shallow = crawl_mesh(&m, 1).await;
        assert_eq!(shallow.nodes.iter().filter(|n| n.is_dangling).count(), 5);
    }

    #[tokio::test]
    async fn test_crawl_and_analysis_are_deterministic() {
        let m = mesh(6);
        let first = crawl_mesh(&m, 3).await;
        let second = crawl_mesh(&m, 3).await;
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);

        let analyzer = GraphAnalyzer::default();
        assert_eq!(analyzer.analyze(&first), analyzer.analyze(&second));
        assert_eq!(
            analyzer.layout(&first, None).unwrap(),
            analyzer.layout(&second, None).unwrap()
        );
    }

    #[tokio::test]
    async fn test_persisted_crawl_analyzes_identically() {
        let m = mesh(4);
        let result = crawl_mesh(&m, 2).await;

        let dir = tempdir().unwrap();
        let path = dir.path().join("crawl.json");
        save_crawl(&path, &result).await.unwrap();
        let reloaded = load_crawl(&path).await.unwrap();

        assert_eq!(reloaded, result);
        let analyzer = GraphAnalyzer::default();
        assert_eq!(analyzer.analyze(&reloaded), analyzer.analyze(&result));
    }

    #[tokio::test]
    async fn test_failed_spoke_is_reported_not_hidden() {
        let m = mesh(3);
        let loader = MockBatchLoader::new(m.batch.clone()).failing_on(&m.spokes[2]);
        let result = crawler_for(&m, loader, CrawlConfig::default())
            .crawl(&m.hub, CrawlOptions::with_depth(3), |_| {})
            .await
            .unwrap();

        assert!(!result.is_complete());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].oapp_id, m.spokes[2]);
        assert!(result.node(&m.spokes[2]).unwrap().is_dangling);
        assert!(!result.node(&m.spokes[0]).unwrap().is_dangling);
        assert_closed(&result);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts() {
        let m = mesh(3);
        let loader = MockBatchLoader::new(m.batch.clone()).failing_on(&m.spokes[0]);
        let config = CrawlConfig {
            fail_fast: true,
            ..CrawlConfig::default()
        };
        let err = crawler_for(&m, loader, config)
            .crawl(&m.hub, CrawlOptions::with_depth(3), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::UpstreamFetch { ref oapp_id, .. } if oapp_id == &m.spokes[0]));
    }

    #[tokio::test]
    async fn test_cancellation_reports_progress() {
        let (batch, ids) = chain(8);
        let flag = CancelFlag::new();
        let loader = MockBatchLoader::new(batch).cancelling_after(3, flag.clone());
        let crawler = SecurityCrawler::new(
            Arc::new(loader),
            Default::default(),
            CrawlConfig::default(),
        );

        let err = crawler
            .crawl(&ids[0], CrawlOptions::with_depth(10).cancellable(flag), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_chain_depth_bounds_fetches() {
        let (batch, ids) = chain(8);
        let loader = Arc::new(MockBatchLoader::new(batch));
        let crawler = SecurityCrawler::new(loader.clone(), Default::default(), CrawlConfig::default());

        let mut progress = Vec::new();
        let result = crawler
            .crawl(&ids[0], CrawlOptions::with_depth(4), |status: &str| {
                progress.push(status.to_string())
            })
            .await
            .unwrap();

        assert_eq!(loader.calls().len(), 4);
        assert_eq!(progress.len(), 4);
        assert_eq!(result.node(&ids[3]).unwrap().depth, 3);
        assert!(result.node(&ids[4]).unwrap().is_dangling);
        assert!(result.node(&ids[5]).is_none());
    }

    #[tokio::test]
    async fn test_snapshot_ranks_default_config_oapps() {
        let mut m = mesh(3);
        for (id, flag) in [(&m.spokes[0], true), (&m.spokes[2], true), (&m.hub, false)] {
            m.batch.origin.insert(
                id.clone(),
                vec![SecurityConfigRow {
                    eid: "30101".to_string(),
                    uses_default_config: Some(flag),
                    ..Default::default()
                }],
            );
        }
        let snapshot = SnapshotBatchLoader::new(m.batch.clone());

        let ranked = snapshot.default_config_oapps(10).await.unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.oapp_id.as_str()).collect();
        // Spoke 2 has more traffic than spoke 0.
        assert_eq!(ids, vec![m.spokes[2].as_str(), m.spokes[0].as_str()]);
    }
}
