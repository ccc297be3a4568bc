//! # Inbound Ports

use shared_types::CrawlResult;

use crate::domain::{GraphAnalysis, LayoutError, NodePosition};

/// Graph analysis API - inbound port.
pub trait GraphAnalysisApi: Send + Sync {
    /// Classify every edge and derive dominant policy and blocked nodes.
    fn analyze(&self, crawl: &CrawlResult) -> GraphAnalysis;

    /// Position every node around `center` (the seed when `None`).
    fn layout(
        &self,
        crawl: &CrawlResult,
        center: Option<&str>,
    ) -> Result<Vec<NodePosition>, LayoutError>;
}
