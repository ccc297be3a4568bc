//! # Security Crawler Service
//!
//! Breadth-first walk over peer registrations starting at a seed OApp.
//!
//! ## Traversal
//!
//! ```text
//! frontier (FIFO) ──► fetch batch ──► resolve routes ──► node + edges
//!        ▲                                                  │
//!        └──────── live, resolvable peers under the depth ◄─┘
//! ```
//!
//! A peer found at depth `d` is enqueued only when `d + 1 < depth`, so depth
//! 1 fetches the seed alone. Blocking peers (zero/dead) still produce an edge
//! but are never fetched. Once the frontier drains, every edge endpoint that
//! was never fetched becomes a dangling node.
//!
//! Each call owns its own frontier and graph; the service only holds the
//! loader handle and configuration.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use oapp_01_config_resolver::{ResolveInput, RouteResolver, SecurityConfigResolver};
use oapp_telemetry::{time_histogram, CRAWL_DURATION, CRAWL_FETCH_FAILURES, CRAWL_NODES_PROCESSED};
use shared_types::{
    ConfigBatch, CrawlConfig, CrawlResult, ExplorerConfig, FetchFailure, GraphEdge, GraphNode,
    OAppId, PeerStateHint, ResolverConfig,
};
use tracing::{debug, info, warn};

use crate::algorithms::{build_edge, merge_edge};
use crate::domain::{CrawlError, CrawlOptions};
use crate::ports::{ConfigBatchLoader, SecurityCrawlApi};

/// Mutable state of one crawl.
#[derive(Default)]
struct CrawlState {
    nodes: Vec<GraphNode>,
    node_index: BTreeMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: BTreeMap<String, usize>,
    frontier: VecDeque<(String, u32)>,
    visited: BTreeSet<String>,
    pending: BTreeSet<String>,
    failures: Vec<FetchFailure>,
    processed: usize,
}

impl CrawlState {
    fn enqueue(&mut self, id: String, depth: u32) {
        if !self.visited.contains(&id) && self.pending.insert(id.clone()) {
            self.frontier.push_back((id, depth));
        }
    }

    fn add_edge(&mut self, edge: GraphEdge) {
        let key = edge.key();
        match self.edge_index.get(&key) {
            Some(&i) => merge_edge(&mut self.edges[i], edge),
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    fn add_node(&mut self, node: GraphNode) {
        if !self.node_index.contains_key(&node.id) {
            self.node_index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }

    /// Materialize every edge endpoint that was never fetched.
    fn add_dangling_nodes(&mut self) {
        let endpoints: Vec<String> = self
            .edges
            .iter()
            .flat_map(|e| [e.from.clone(), e.to.clone()])
            .collect();

        for id in endpoints {
            if self.node_index.contains_key(&id) {
                continue;
            }
            let node = match OAppId::parse(&id) {
                Ok(oapp) => GraphNode::dangling(&id, oapp.endpoint_id(), oapp.address()),
                Err(_) => GraphNode::dangling(&id, "", ""),
            };
            self.add_node(node);
        }
    }
}

/// Work derived from one fetched node, applied in one step.
struct NodeOutcome {
    node: GraphNode,
    edges: Vec<GraphEdge>,
    peers: Vec<String>,
}

/// Security Crawler.
pub struct SecurityCrawler {
    loader: Arc<dyn ConfigBatchLoader>,
    resolver: SecurityConfigResolver,
    config: CrawlConfig,
}

impl SecurityCrawler {
    /// Create a crawler.
    pub fn new(
        loader: Arc<dyn ConfigBatchLoader>,
        resolver_config: ResolverConfig,
        config: CrawlConfig,
    ) -> Self {
        Self {
            loader,
            resolver: SecurityConfigResolver::new(resolver_config),
            config,
        }
    }

    /// Create a crawler from the explorer configuration.
    pub fn from_config(loader: Arc<dyn ConfigBatchLoader>, config: &ExplorerConfig) -> Self {
        Self::new(loader, config.resolver.clone(), config.crawl.clone())
    }

    /// Crawl configuration.
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Resolve one fetched node into its graph contributions.
    fn process_node(&self, oapp: &OAppId, id: &str, depth: u32, batch: &ConfigBatch) -> NodeOutcome {
        let resolved = self
            .resolver
            .resolve(&ResolveInput::from_batch(batch, oapp, id));

        let referencing = batch.referencing.get(id).map(Vec::as_slice).unwrap_or(&[]);
        let stats = batch.route_stats.get(id).map(Vec::as_slice).unwrap_or(&[]);

        let mut edges = Vec::new();
        let mut peers = Vec::new();
        for row in &resolved.rows {
            let Some(edge) = build_edge(id, row, referencing, stats) else {
                continue;
            };
            if row.peer_state_hint != PeerStateHint::ExplicitBlocked {
                peers.push(edge.from.clone());
            }
            edges.push(edge);
        }

        let record = batch.oapps.get(id);
        let node = GraphNode {
            id: id.to_string(),
            local_endpoint_id: oapp.endpoint_id().to_string(),
            address: oapp.address().to_string(),
            total_packets_received: record.map(|r| r.total_packets_received).unwrap_or(0),
            is_tracked: record.is_some(),
            is_dangling: false,
            depth: depth as i32,
            security_configs: resolved.rows,
        };

        NodeOutcome { node, edges, peers }
    }

    /// Crawl with a generic progress callback.
    pub async fn crawl<F>(
        &self,
        seed: &str,
        options: CrawlOptions,
        mut on_progress: F,
    ) -> Result<CrawlResult, CrawlError>
    where
        F: FnMut(&str) + Send,
    {
        self.run(seed, options, &mut on_progress).await
    }

    async fn run(
        &self,
        seed: &str,
        options: CrawlOptions,
        on_progress: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CrawlResult, CrawlError> {
        let seed = OAppId::parse(seed)?.to_string();
        let max_depth = self.config.effective_depth(options.depth);
        let _timer = time_histogram!(CRAWL_DURATION);

        info!("[oapp-02] Crawling from {} (depth {})", seed, max_depth);

        let mut state = CrawlState::default();
        state.enqueue(seed.clone(), 0);

        while let Some((id, depth)) = state.frontier.pop_front() {
            if options.is_cancelled() {
                info!("[oapp-02] Crawl cancelled after {} nodes", state.processed);
                return Err(CrawlError::Cancelled {
                    processed: state.processed,
                });
            }

            state.pending.remove(&id);
            if !state.visited.insert(id.clone()) {
                continue;
            }

            let oapp = match OAppId::parse(&id) {
                Ok(oapp) => oapp,
                Err(e) => {
                    warn!("[oapp-02] Skipping malformed peer id {}: {}", id, e);
                    continue;
                }
            };

            let batch = match self.loader.fetch_batch(std::slice::from_ref(&id)).await {
                Ok(batch) => batch,
                Err(source) => {
                    CRAWL_FETCH_FAILURES.inc();
                    if id == seed || self.config.fail_fast {
                        return Err(CrawlError::UpstreamFetch { oapp_id: id, source });
                    }
                    warn!("[oapp-02] Fetch failed for {} at depth {}: {}", id, depth, source);
                    on_progress(&format!("{} (depth {}): fetch failed: {}", id, depth, source));
                    state.failures.push(FetchFailure {
                        oapp_id: id,
                        depth: depth as i32,
                        error: source.to_string(),
                    });
                    continue;
                }
            };

            if options.is_cancelled() {
                info!("[oapp-02] Crawl cancelled after {} nodes", state.processed);
                return Err(CrawlError::Cancelled {
                    processed: state.processed,
                });
            }

            let outcome = self.process_node(&oapp, &id, depth, &batch);
            let routes = outcome.node.security_configs.len();
            let edge_count = outcome.edges.len();

            state.add_node(outcome.node);
            for edge in outcome.edges {
                state.add_edge(edge);
            }
            if depth + 1 < max_depth {
                for peer in outcome.peers {
                    state.enqueue(peer, depth + 1);
                }
            }

            state.processed += 1;
            CRAWL_NODES_PROCESSED.inc();
            debug!(
                "[oapp-02] {} (depth {}): {} routes, {} edges, {} queued",
                id,
                depth,
                routes,
                edge_count,
                state.frontier.len()
            );
            on_progress(&format!(
                "Processed {} (depth {}): {} routes, {} queued",
                id,
                depth,
                routes,
                state.frontier.len()
            ));
        }

        state.add_dangling_nodes();

        info!(
            "[oapp-02] Crawl from {} done: {} nodes, {} edges, {} failures",
            seed,
            state.nodes.len(),
            state.edges.len(),
            state.failures.len()
        );

        Ok(CrawlResult {
            seed,
            crawl_depth: max_depth,
            timestamp: Utc::now(),
            nodes: state.nodes,
            edges: state.edges,
            failures: state.failures,
        })
    }
}

#[async_trait]
impl SecurityCrawlApi for SecurityCrawler {
    async fn crawl(
        &self,
        seed: &str,
        options: CrawlOptions,
        on_progress: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<CrawlResult, CrawlError> {
        self.run(seed, options, on_progress).await
    }
}
