//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single walk scenario from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    /// Chunks exactly as the source delivers them
    pub chunks: Vec<String>,
    /// Expected node sequence
    pub nodes: Vec<ExpectedNode>,
    /// Whether the heuristic strategy is expected to get this one right
    #[serde(default)]
    pub heuristic: bool,
    /// Whether the sequence is also exact under the link scope. Documents the
    /// tree builder restructures after the fact are only exact under the
    /// subtree scope.
    #[serde(default = "default_true")]
    pub link_scope: bool,
}

fn default_true() -> bool {
    true
}

impl TestCase {
    /// The whole document, as if it had arrived in one piece.
    pub fn document(&self) -> String {
        self.chunks.concat()
    }
}

/// Expected node - `[depth, name]` or `[depth, name, detail]`
///
/// The detail is the text of text and comment nodes and the attribute list
/// (`class="foo"`) of elements.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedNode {
    Bare(usize, String),
    WithDetail(usize, String, String),
}

impl ExpectedNode {
    /// Same shape as `harness::format_node`.
    pub fn format(&self) -> String {
        match self {
            ExpectedNode::Bare(depth, name) => format!("{} {}", depth, name),
            ExpectedNode::WithDetail(depth, name, detail) => {
                format!("{} {} {:?}", depth, name, detail)
            }
        }
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
