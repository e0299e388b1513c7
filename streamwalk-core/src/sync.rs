//! Boundary synchronization.
//!
//! The live tree is only partly final at any moment: the element that was
//! open when the last chunk ended may still get children, and so may every
//! one of its ancestors. The [`Synchronizer`] answers "is this link safe to
//! read yet?" and pulls chunks until it is.
//!
//! With [`BoundaryStrategy::Sentinel`] a marker comment is written after every
//! chunk. Wherever the parser put it is the frontier of the stream. The
//! marker is located and detached again right away; what is kept is its
//! parent, the *frontier*: the next content goes after the last child of that
//! node. The live tree never holds a marker between calls.
//!
//! [`BoundaryStrategy::Heuristic`] writes nothing into the tree. It pulls one
//! chunk before answering for a node whose name is in the provisional set,
//! and one more when the link is missing.

use crate::config::{BoundaryStrategy, SentinelScope, WalkerConfig};
use crate::dom::{Document, NodeId, NodeKind};
use crate::error::WalkError;
use crate::parser::IncrementalParser;
use crate::source::{ChunkSource, Utf8Decoder};

/// The structural link a traversal query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    FirstChild,
    NextSibling,
}

/// Owns the stream side of a walk: source, decoder and parser.
#[derive(Debug)]
pub(crate) struct Synchronizer<S, P> {
    source: S,
    decoder: Utf8Decoder,
    parser: P,
    config: WalkerConfig,
    /// Node whose child list the next chunk extends; `None` when no marker
    /// was seen (heuristic strategy, end of stream, or a swallowed marker)
    frontier: Option<NodeId>,
    ended: bool,
    chunks: usize,
}

impl<S, P> Synchronizer<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
    pub(crate) fn new(source: S, parser: P, config: WalkerConfig) -> Self {
        Synchronizer {
            source,
            decoder: Utf8Decoder::new(),
            parser,
            config,
            frontier: None,
            ended: false,
            chunks: 0,
        }
    }

    pub(crate) fn document(&self) -> &Document {
        self.parser.document()
    }

    pub(crate) fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub(crate) fn is_ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn chunks_read(&self) -> usize {
        self.chunks
    }

    pub(crate) fn bytes_read(&self) -> u64 {
        self.decoder.total_bytes()
    }

    /// Pull and parse one chunk. Returns `false` once the stream has ended.
    ///
    /// After end-of-stream this is a no-op and the source is never read
    /// again.
    pub(crate) fn pull(&mut self) -> Result<bool, WalkError> {
        if self.ended {
            return Ok(false);
        }

        let chunk = self
            .source
            .read()
            .map_err(|e| WalkError::from_source(self.chunks, e))?;

        let Some(bytes) = chunk else {
            self.end();
            return Ok(false);
        };

        self.chunks += 1;
        log::debug!("chunk {}: {} bytes", self.chunks, bytes.len());
        let text = self.decoder.decode(&bytes);
        if !text.is_empty() {
            self.parser.write(&text);
        }
        if self.config.strategy == BoundaryStrategy::Sentinel {
            self.parser.write_marker(&self.config.sentinel);
            self.frontier = self.take_marker();
        }
        Ok(true)
    }

    fn end(&mut self) {
        self.ended = true;
        self.frontier = None;
        if let Some(rest) = self.decoder.finish() {
            self.parser.write(&rest);
        }
        self.parser.finish();
        log::debug!(
            "end of stream after {} chunk(s), {} bytes",
            self.chunks,
            self.decoder.total_bytes()
        );
    }

    /// Make `link` of `node` safe to read, pulling as many chunks as needed.
    pub(crate) fn resolve(&mut self, node: NodeId, link: Link) -> Result<(), WalkError> {
        match self.config.strategy {
            BoundaryStrategy::Sentinel => {
                while !self.ended && !self.is_settled(node, link) {
                    self.pull()?;
                }
            }
            BoundaryStrategy::Heuristic => {
                let provisional = self
                    .document()
                    .element_name(node)
                    .is_some_and(|name| self.config.is_provisional(name));
                if provisional {
                    self.pull()?;
                }
                if self.follow(node, link).is_none() {
                    self.pull()?;
                }
            }
        }
        Ok(())
    }

    /// Read `link` of `node` as the tree stands.
    pub(crate) fn follow(&self, node: NodeId, link: Link) -> Option<NodeId> {
        let doc = self.document();
        match link {
            Link::FirstChild => doc.first_child(node),
            Link::NextSibling => doc.next_sibling(node),
        }
    }

    fn is_settled(&self, node: NodeId, link: Link) -> bool {
        let Some(frontier) = self.frontier else {
            return true;
        };
        let doc = self.parser.document();
        match self.config.scope {
            SentinelScope::Subtree => !in_region(doc, node, link, frontier),
            // A present target is final: text after a boundary always
            // starts a new node.
            SentinelScope::Link => {
                self.follow(node, link).is_some() || !in_region(doc, node, link, frontier)
            }
        }
    }

    /// Find the marker just written, detach it and return its parent.
    ///
    /// Parsers append at their insertion point, which is the end of the
    /// last-child chain; anything else falls back to a full scan.
    fn take_marker(&mut self) -> Option<NodeId> {
        let doc = self.parser.document();
        let payload = self.config.sentinel.as_str();
        let is_marker = |id: NodeId| matches!(doc.kind(id), NodeKind::Comment(c) if c == payload);

        let mut found = None;
        let mut cur = doc.last_child(doc.root_id());
        while let Some(id) = cur {
            if is_marker(id) {
                found = Some(id);
                break;
            }
            cur = doc.last_child(id);
        }
        if found.is_none() {
            found = doc.descendants(doc.root_id()).find(|&id| is_marker(id));
        }

        let Some(marker) = found else {
            // The parser swallowed it (e.g. as raw text).
            log::trace!("sentinel not in tree after chunk {}", self.chunks);
            return None;
        };
        let frontier = doc.parent(marker);
        self.parser.detach(marker);
        log::trace!("frontier after chunk {}: {:?}", self.chunks, frontier);
        frontier
    }
}

/// Whether content appended to `frontier` could still change `link` of `node`.
///
/// For the first child that is the case while `node` contains the frontier.
/// For the next sibling it is also the case when the frontier is `node`'s
/// parent (a new sibling goes after `node`) or lies inside a later sibling.
fn in_region(doc: &Document, node: NodeId, link: Link, frontier: NodeId) -> bool {
    if doc.is_inclusive_ancestor(node, frontier) {
        return true;
    }
    if link == Link::FirstChild {
        return false;
    }
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    if frontier == parent {
        return true;
    }
    // The frontier's ancestor among node's siblings, if any.
    let mut cur = Some(frontier);
    while let Some(id) = cur {
        if doc.parent(id) == Some(parent) {
            let mut sibling = doc.next_sibling(node);
            while let Some(s) = sibling {
                if s == id {
                    return true;
                }
                sibling = doc.next_sibling(s);
            }
            return false;
        }
        cur = doc.parent(id);
    }
    false
}
