//! Subcommand implementations. Each returns the JSON value to print.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use oapp_02_security_crawler::{
    load_crawl, save_crawl, CancelFlag, ConfigBatchLoader, CrawlOptions, DefaultConfigDirectory,
    GraphqlBatchLoader, SecurityCrawler, SnapshotBatchLoader,
};
use oapp_03_graph_analyzer::{GraphAnalysisApi, GraphAnalyzer};
use oapp_telemetry::{encode_metrics, register_metrics};
use serde_json::{json, Value};
use shared_types::ExplorerConfig;
use tracing::info;

use crate::cli::SourceArgs;

/// Load the config file, or defaults without one.
pub fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    match path {
        Some(path) => ExplorerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ExplorerConfig::default()),
    }
}

/// A batch source usable both for crawling and for the default-config list.
enum Source {
    Snapshot(Arc<SnapshotBatchLoader>),
    Graphql(Arc<GraphqlBatchLoader>),
}

impl Source {
    async fn open(args: &SourceArgs, config: &ExplorerConfig) -> Result<Self> {
        if let Some(path) = &args.snapshot {
            let loader = SnapshotBatchLoader::from_path(path)
                .await
                .with_context(|| format!("failed to read snapshot {}", path.display()))?;
            return Ok(Self::Snapshot(Arc::new(loader)));
        }

        let mut loader_config = config.loader.clone();
        if let Some(endpoint) = &args.endpoint {
            loader_config.endpoint = endpoint.clone();
        }
        let loader = GraphqlBatchLoader::new(&loader_config).context("failed to build HTTP client")?;
        Ok(Self::Graphql(Arc::new(loader)))
    }

    fn loader(&self) -> Arc<dyn ConfigBatchLoader> {
        match self {
            Self::Snapshot(l) => l.clone(),
            Self::Graphql(l) => l.clone(),
        }
    }

    fn directory(&self) -> &dyn DefaultConfigDirectory {
        match self {
            Self::Snapshot(l) => &**l,
            Self::Graphql(l) => &**l,
        }
    }
}

/// `crawl`: returns the crawl, or a short receipt when written to a file.
pub async fn crawl(
    config: &ExplorerConfig,
    seed: &str,
    depth: Option<u32>,
    source: &SourceArgs,
    output: Option<&Path>,
    cancel: CancelFlag,
) -> Result<Value> {
    let source = Source::open(source, config).await?;
    let crawler = SecurityCrawler::from_config(source.loader(), config);

    let options = CrawlOptions {
        depth,
        cancel: Some(cancel),
    };
    let result = crawler
        .crawl(seed, options, |status: &str| info!("[explorer] {}", status))
        .await
        .with_context(|| format!("crawl from {} failed", seed))?;

    match output {
        Some(path) => {
            save_crawl(path, &result).await?;
            Ok(json!({
                "output": path.display().to_string(),
                "nodes": result.nodes.len(),
                "edges": result.edges.len(),
                "failures": result.failures.len(),
            }))
        }
        None => Ok(serde_json::to_value(&result)?),
    }
}

/// `analyze`: classification of a saved crawl.
pub async fn analyze(config: &ExplorerConfig, crawl: &Path) -> Result<Value> {
    let result = load_crawl(crawl).await?;
    let analysis = GraphAnalyzer::from_config(config).analyze(&result);
    Ok(serde_json::to_value(&analysis)?)
}

/// `layout`: node positions of a saved crawl.
pub async fn layout(config: &ExplorerConfig, crawl: &Path, center: Option<&str>) -> Result<Value> {
    let result = load_crawl(crawl).await?;
    let positions = GraphAnalyzer::from_config(config).layout(&result, center)?;
    Ok(serde_json::to_value(&positions)?)
}

/// `defaults`: default-config OApps ranked by traffic.
pub async fn defaults(config: &ExplorerConfig, source: &SourceArgs, limit: usize) -> Result<Value> {
    let source = Source::open(source, config).await?;
    let ranked = source
        .directory()
        .default_config_oapps(limit)
        .await
        .context("failed to list default-config OApps")?;
    Ok(serde_json::to_value(&ranked)?)
}

/// Prometheus text for the metrics gathered during this run.
pub fn metrics_report() -> Result<String> {
    register_metrics()?;
    Ok(encode_metrics()?)
}
