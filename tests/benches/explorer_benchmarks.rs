//! # OApp Explorer Benchmarks
//!
//! | Stage | Input |
//! |-------|-------|
//! | Resolver | hub with N inbound routes |
//! | Crawler | hub-and-spoke mesh, full depth |
//! | Analyzer | classification, dominant policy, layout |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use oapp_01_config_resolver::{ResolveInput, RouteResolver, SecurityConfigResolver};
use oapp_02_security_crawler::{CrawlOptions, MockBatchLoader, SecurityCrawler};
use oapp_03_graph_analyzer::{GraphAnalysisApi, GraphAnalyzer};
use oapp_tests::fixtures::mesh;
use shared_types::{CrawlConfig, CrawlResult, OAppId};

const SIZES: [usize; 3] = [10, 50, 200];

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("oapp-01-resolver");

    for size in SIZES {
        let m = mesh(size);
        let resolver = SecurityConfigResolver::new(m.resolver.clone());
        let hub = OAppId::parse(&m.hub).expect("fixture hub id");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("resolve_hub", size), &m, |b, m| {
            b.iter(|| {
                let input = ResolveInput::from_batch(&m.batch, &hub, &m.hub);
                black_box(resolver.resolve(&input))
            })
        });
    }

    group.finish();
}

fn mesh_crawler(size: usize) -> (SecurityCrawler, String) {
    let m = mesh(size);
    let crawler = SecurityCrawler::new(
        Arc::new(MockBatchLoader::new(m.batch.clone())),
        m.resolver.clone(),
        CrawlConfig::default(),
    );
    (crawler, m.hub)
}

fn bench_crawler(c: &mut Criterion) {
    let mut group = c.benchmark_group("oapp-02-crawler");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    for size in SIZES {
        let (crawler, hub) = mesh_crawler(size);
        group.throughput(Throughput::Elements(size as u64 + 1));
        group.bench_function(BenchmarkId::new("crawl_mesh", size), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    black_box(
                        crawler
                            .crawl(&hub, CrawlOptions::with_depth(3), |_| {})
                            .await
                            .is_ok(),
                    )
                })
            })
        });
    }

    group.finish();
}

fn bench_analyzer(c: &mut Criterion) {
    let mut group = c.benchmark_group("oapp-03-analyzer");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let analyzer = GraphAnalyzer::default();

    for size in SIZES {
        let (crawler, hub) = mesh_crawler(size);
        let result: CrawlResult = runtime
            .block_on(crawler.crawl(&hub, CrawlOptions::with_depth(3), |_| {}))
            .expect("fixture crawl");

        group.throughput(Throughput::Elements(result.edges.len() as u64));
        group.bench_with_input(BenchmarkId::new("analyze", size), &result, |b, r| {
            b.iter(|| black_box(analyzer.analyze(r)))
        });
        group.bench_with_input(BenchmarkId::new("layout", size), &result, |b, r| {
            b.iter(|| black_box(analyzer.layout(r, None).map(|p| p.len())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolver, bench_crawler, bench_analyzer);
criterion_main!(benches);
