//! # Graph Analyzer Service
//!
//! Runs classification, dominant-policy detection and blocked-node
//! detection over a finished crawl.

use std::collections::BTreeMap;

use shared_types::{AnalyzerConfig, CrawlResult, ExplorerConfig, GraphNode, LayoutConfig};
use tracing::{debug, info};

use crate::algorithms::{blocked_nodes, classify_edge, compare_to_dominant, dominant_combination, layout_graph};
use crate::domain::{AnalysisSummary, EdgeSecurity, GraphAnalysis, LayoutError, NodePosition};
use crate::ports::GraphAnalysisApi;

/// Graph analyzer.
#[derive(Debug, Clone, Default)]
pub struct GraphAnalyzer {
    config: AnalyzerConfig,
    layout: LayoutConfig,
}

impl GraphAnalyzer {
    /// Create an analyzer.
    pub fn new(config: AnalyzerConfig, layout: LayoutConfig) -> Self {
        Self { config, layout }
    }

    /// Create from the explorer configuration.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(config.analyzer.clone(), config.layout.clone())
    }

    /// Analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify edges in crawl order.
    fn classify_all(&self, crawl: &CrawlResult) -> Vec<EdgeSecurity> {
        let nodes: BTreeMap<&str, &GraphNode> =
            crawl.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        crawl
            .edges
            .iter()
            .map(|edge| {
                let route = nodes
                    .get(edge.to.as_str())
                    .and_then(|node| node.config_for(&edge.source_endpoint_id));
                if route.is_none() {
                    debug!(
                        "[oapp-03] No route config on {} for {}, using edge hints",
                        edge.to, edge.source_endpoint_id
                    );
                }
                classify_edge(edge, route, &self.config)
            })
            .collect()
    }
}

impl GraphAnalysisApi for GraphAnalyzer {
    fn analyze(&self, crawl: &CrawlResult) -> GraphAnalysis {
        let mut classified = self.classify_all(crawl);
        let dominant = dominant_combination(&classified);

        if let Some(dom) = &dominant {
            for edge in &mut classified {
                compare_to_dominant(edge, dom);
            }
        }

        let mut edges = BTreeMap::new();
        for edge in classified {
            let key = shared_types::edge_key(&edge.from, &edge.to);
            edges.entry(key).or_insert(edge);
        }

        let blocked = blocked_nodes(crawl, &edges);
        let summary = AnalysisSummary {
            total_edges: edges.len(),
            blocked_edges: edges.values().filter(|e| e.is_blocked).count(),
            differing_edges: edges.values().filter(|e| e.differs_from_popular).count(),
            sentinel_edges: edges.values().filter(|e| e.uses_sentinel).count(),
            blocked_nodes: blocked.len(),
            dangling_nodes: crawl.nodes.iter().filter(|n| n.is_dangling).count(),
        };

        info!(
            "[oapp-03] Analyzed {} edges: {} blocked, {} differing, {} blocked nodes",
            summary.total_edges, summary.blocked_edges, summary.differing_edges, summary.blocked_nodes
        );

        GraphAnalysis {
            edges,
            dominant,
            blocked_nodes: blocked,
            summary,
        }
    }

    fn layout(
        &self,
        crawl: &CrawlResult,
        center: Option<&str>,
    ) -> Result<Vec<NodePosition>, LayoutError> {
        let center = center.unwrap_or(&crawl.seed);
        layout_graph(crawl, center, &self.layout)
    }
}
