//! Walk helpers and comparison against a one-piece parse

use crate::common::{Gen, TestCase};
use streamwalk_core::{
    walk_nodes_with, Document, HtmlParser, IterSource, NodeId, NodeKind, StreamNode, WalkerConfig,
};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub chunks: Vec<Vec<u8>>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Walk `chunks` to the end, panicking on a source error.
pub fn walk(chunks: Vec<Vec<u8>>, config: WalkerConfig) -> Vec<StreamNode> {
    walk_nodes_with(IterSource::new(chunks), HtmlParser::new(), config)
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| panic!("walk failed: {}", e))
}

/// Split `input` at the given byte offsets. Repeated offsets give empty chunks.
pub fn chunk_at(input: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = cuts.iter().map(|&c| c.min(input.len())).collect();
    cuts.sort_unstable();
    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(input[start..cut].to_vec());
        start = cut;
    }
    chunks.push(input[start..].to_vec());
    chunks
}

fn detail(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Text(text) | NodeKind::Comment(text) => Some(text.clone()),
        NodeKind::Element { attrs, .. } if !attrs.is_empty() => Some(
            attrs
                .iter()
                .map(|a| format!("{}={:?}", a.name, a.value))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

fn format_line(depth: usize, kind: &NodeKind) -> String {
    match detail(kind) {
        Some(detail) => format!("{} {} {:?}", depth, kind.node_name(), detail),
        None => format!("{} {}", depth, kind.node_name()),
    }
}

/// Format a node for comparison (no ids)
pub fn format_node(node: &StreamNode) -> String {
    format_line(node.depth, &node.kind)
}

/// Format a sequence, joining adjacent text nodes at the same depth.
///
/// Text nodes have no children, so two text entries in a row at the same
/// depth are siblings: one text run cut apart by a chunk boundary.
pub fn merge_text<'a>(nodes: impl IntoIterator<Item = (usize, &'a NodeKind)>) -> Vec<String> {
    let mut merged: Vec<(usize, NodeKind)> = Vec::new();
    for (depth, kind) in nodes {
        if let (NodeKind::Text(more), Some((last_depth, NodeKind::Text(text)))) =
            (kind, merged.last_mut())
        {
            if *last_depth == depth {
                text.push_str(more);
                continue;
            }
        }
        merged.push((depth, kind.clone()));
    }
    merged.iter().map(|(depth, kind)| format_line(*depth, kind)).collect()
}

/// Pre-order of the subtree at `root`, with depths relative to it.
pub fn preorder(doc: &Document, root: NodeId) -> Vec<(usize, NodeId)> {
    doc.descendants(root)
        .map(|id| {
            let mut depth = 0;
            let mut cur = id;
            while cur != root {
                depth += 1;
                cur = doc.parent(cur).expect("descendant has a parent");
            }
            (depth, id)
        })
        .collect()
}

/// Expected sequence: `input` parsed in one piece, text runs merged.
pub fn reference(input: &str) -> Vec<String> {
    let doc = HtmlParser::parse_str(input);
    let Some(root) = doc.document_element() else {
        return Vec::new();
    };
    merge_text(preorder(&doc, root).into_iter().map(|(depth, id)| (depth, doc.kind(id))))
}

fn compare(expected: &[String], actual: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if actual.len() != expected.len() {
        errors.push(format!(
            "Node count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }
    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Node {}: expected '{}', got '{}'", i, exp, act));
        }
    }
    errors
}

/// Run a fixture with its own chunking, comparing nodes exactly.
pub fn run_case(case: &TestCase, config: WalkerConfig) -> TestResult {
    let chunks: Vec<Vec<u8>> = case.chunks.iter().map(|c| c.as_bytes().to_vec()).collect();
    let nodes = walk(chunks.clone(), config);

    let actual: Vec<String> = nodes.iter().map(format_node).collect();
    let expected: Vec<String> = case.nodes.iter().map(|n| n.format()).collect();
    let errors = compare(&expected, &actual);

    TestResult { passed: errors.is_empty(), chunks, expected, actual, seed: 0, errors }
}

/// Run a fixture's document re-split at random byte offsets.
///
/// Compared against the one-piece parse after merging text runs, since a
/// chunk boundary inside text leaves two text nodes behind.
pub fn run_with_splits(case: &TestCase, gen: &mut Gen, config: WalkerConfig) -> TestResult {
    let document = case.document();
    let chunks = gen.split(document.as_bytes());
    let nodes = walk(chunks.clone(), config);

    let actual = merge_text(nodes.iter().map(|n| (n.depth, &n.kind)));
    let expected = reference(&document);
    let errors = compare(&expected, &actual);

    TestResult { passed: errors.is_empty(), chunks, expected, actual, seed: gen.seed, errors }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set STREAMWALK_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nChunks:");
        for (i, c) in self.chunks.iter().enumerate() {
            eprintln!("  {}: {:?}", i, String::from_utf8_lossy(c));
        }
        eprintln!("\nExpected nodes:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual nodes:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
