//! Benchmarks for walking chunked documents.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use streamwalk_core::{walk_nodes_with, HtmlParser, IterSource, SentinelScope, WalkerConfig};

/// A flat-ish page: many sibling sections with a bit of nesting each.
fn page(sections: usize) -> String {
    let mut out = String::from("<!DOCTYPE html><html><head><title>Bench</title></head><body>");
    for i in 0..sections {
        out.push_str(&format!(
            "<section id=s{i}><h2>Section {i}</h2><p class=\"lead\">Some text &amp; an \
             <a href=\"/{i}\">anchor</a>.</p><ul><li>one<li>two<li>three</ul><!-- end {i} --></section>"
        ));
    }
    out.push_str("</body></html>");
    out
}

fn chunks(input: &str, size: usize) -> Vec<Vec<u8>> {
    input.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}

fn count(chunks: Vec<Vec<u8>>, config: WalkerConfig) -> usize {
    walk_nodes_with(IterSource::new(chunks), HtmlParser::new(), config)
        .filter(|n| n.is_ok())
        .count()
}

/// Baseline: parse the whole page in one piece.
fn bench_parse_one_piece(c: &mut Criterion) {
    let input = page(200);

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("one_piece", |b| {
        b.iter(|| HtmlParser::parse_str(black_box(&input)).len())
    });
    group.finish();
}

/// Walk with the sentinel strategy at a range of chunk sizes.
fn bench_walk_sentinel(c: &mut Criterion) {
    let input = page(200);

    let mut group = c.benchmark_group("walk_sentinel");
    group.throughput(Throughput::Bytes(input.len() as u64));

    for size in [64, 1024, 8192] {
        for (label, scope) in [("subtree", SentinelScope::Subtree), ("link", SentinelScope::Link)] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                b.iter_batched(
                    || chunks(&input, size),
                    |chunks| count(chunks, WalkerConfig::sentinel().with_scope(scope)),
                    criterion::BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

/// Walk with the heuristic strategy for comparison.
fn bench_walk_heuristic(c: &mut Criterion) {
    let input = page(200);

    let mut group = c.benchmark_group("walk_heuristic");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("1024", |b| {
        b.iter_batched(
            || chunks(&input, 1024),
            |chunks| count(chunks, WalkerConfig::heuristic()),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_parse_one_piece, bench_walk_sentinel, bench_walk_heuristic);
criterion_main!(benches);
