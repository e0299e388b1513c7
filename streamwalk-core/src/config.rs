//! Walker configuration.
//!
//! Everything has a sensible default; most callers only pick a strategy.
//!
//! ```
//! use streamwalk_core::config::{BoundaryStrategy, SentinelScope, WalkerConfig};
//!
//! let config = WalkerConfig::default()
//!     .with_scope(SentinelScope::Link)
//!     .with_sentinel("my-boundary");
//! assert_eq!(config.strategy, BoundaryStrategy::Sentinel);
//! ```

/// How the synchronizer decides that part of the tree is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryStrategy {
    /// Write a sentinel comment after every chunk, note where it landed and
    /// pull until that boundary is outside the inspected region. Exact.
    #[default]
    Sentinel,
    /// Treat a fixed set of element names as provisional and pull once more
    /// when a link is missing. For parsers that cannot take synthetic input.
    ///
    /// Approximation: a text node that a later chunk extends is not told apart
    /// from a final one, so its content may still grow after it is exposed.
    Heuristic,
}

/// How much of the tree must lie before the last boundary for a link to be
/// answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelScope {
    /// The whole inspected region: the node's subtree for `first_child`, the
    /// node's subtree and everything after it in its parent for `next_sibling`.
    #[default]
    Subtree,
    /// Only the link itself: stop as soon as its target exists, or is known
    /// to be absent. Nodes the HTML tree builder later moves (foster
    /// parenting, misnested formatting tags) may be exposed before the move.
    Link,
}

/// Payload of the sentinel comment used by default.
pub const DEFAULT_SENTINEL: &str = "streamwalk:chunk-boundary";

/// Element names the parser synthesizes before real content arrives.
pub const DEFAULT_PROVISIONAL_NAMES: &[&str] = &["html", "head", "body"];

/// Configuration for a [`TreeWalker`](crate::TreeWalker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    pub strategy: BoundaryStrategy,
    /// Only used by [`BoundaryStrategy::Sentinel`].
    pub scope: SentinelScope,
    /// Comment payload marking a chunk boundary. Must not occur as a comment
    /// in the streamed documents.
    pub sentinel: String,
    /// Only used by [`BoundaryStrategy::Heuristic`]. Compared against
    /// lower-case element names.
    pub provisional_names: Vec<String>,
}

impl WalkerConfig {
    /// Sentinel strategy, subtree scope.
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Name-based heuristic strategy.
    pub fn heuristic() -> Self {
        Self::default().with_strategy(BoundaryStrategy::Heuristic)
    }

    pub fn with_strategy(mut self, strategy: BoundaryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_scope(mut self, scope: SentinelScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_sentinel(mut self, payload: impl Into<String>) -> Self {
        self.sentinel = payload.into();
        self
    }

    pub fn with_provisional_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provisional_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn is_provisional(&self, name: &str) -> bool {
        self.provisional_names.iter().any(|n| n == name)
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        WalkerConfig {
            strategy: BoundaryStrategy::default(),
            scope: SentinelScope::default(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            provisional_names: DEFAULT_PROVISIONAL_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
