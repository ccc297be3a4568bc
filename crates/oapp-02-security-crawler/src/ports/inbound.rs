//! # Inbound Ports
//!
//! API trait defining what the crawler can do.

use async_trait::async_trait;
use shared_types::CrawlResult;

use crate::domain::{CrawlError, CrawlOptions};

/// Security crawl API - inbound port.
#[async_trait]
pub trait SecurityCrawlApi: Send + Sync {
    /// Crawl the peer topology around `seed`.
    ///
    /// `on_progress` is called once per processed node.
    async fn crawl(
        &self,
        seed: &str,
        options: CrawlOptions,
        on_progress: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CrawlResult, CrawlError>;
}
