//! The stream as a flat sequence of final nodes.

use crate::config::WalkerConfig;
use crate::dom::{NodeId, NodeKind};
use crate::error::WalkError;
use crate::parser::{HtmlParser, IncrementalParser};
use crate::source::ChunkSource;
use crate::walker::{Cursor, Step, TreeWalker};

/// Snapshot of a node at the moment it was exposed.
///
/// Exposed nodes keep their kind afterwards, with one exception: a repeated
/// `<html>` or `<body>` start tag adds missing attributes to the element
/// already in the tree. The snapshot keeps the attributes seen at exposure;
/// read the live node through [`Nodes::walker`] for the merged set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamNode {
    pub id: NodeId,
    /// Distance from the root (the root itself is 0).
    pub depth: usize,
    pub kind: NodeKind,
}

impl StreamNode {
    /// DOM-style node name (`div`, `#text`, `#comment`).
    pub fn node_name(&self) -> &str {
        self.kind.node_name()
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }
}

/// Pre-order sequence of the nodes of a stream, exposed as they become final.
///
/// Nothing is read from the source before the first call to `next`. After an
/// error has been yielded the sequence is over.
pub struct Nodes<S, P = HtmlParser> {
    pending: Option<(S, P, WalkerConfig)>,
    walker: Option<TreeWalker<S, P>>,
    /// Last yielded node and its depth
    position: Option<(NodeId, usize)>,
    done: bool,
}

/// Walk `source` with the bundled parser and default settings.
///
/// ```
/// use streamwalk_core::{walk_nodes, IterSource};
///
/// let names: Vec<String> = walk_nodes(IterSource::new(["<p>hi", "</p>"]))
///     .map(|node| node.unwrap().node_name().to_string())
///     .collect();
/// assert_eq!(names, ["html", "head", "body", "p", "#text"]);
/// ```
pub fn walk_nodes<S: ChunkSource>(source: S) -> Nodes<S, HtmlParser> {
    walk_nodes_with(source, HtmlParser::new(), WalkerConfig::default())
}

/// Walk `source` with any incremental parser and configuration.
pub fn walk_nodes_with<S, P>(source: S, parser: P, config: WalkerConfig) -> Nodes<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
    Nodes { pending: Some((source, parser, config)), walker: None, position: None, done: false }
}

impl<S, P> Nodes<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
    pub(crate) fn from_walker(walker: TreeWalker<S, P>) -> Self {
        Nodes { pending: None, walker: Some(walker), position: None, done: false }
    }

    /// The walker driving the sequence, once the first node was requested.
    pub fn walker(&self) -> Option<&TreeWalker<S, P>> {
        self.walker.as_ref()
    }

    fn advance(&mut self) -> Result<Option<(NodeId, usize)>, WalkError> {
        if let Some((source, parser, config)) = self.pending.take() {
            self.walker = Some(TreeWalker::with_parser(source, parser, config)?);
        }
        let Some(walker) = self.walker.as_mut() else {
            return Ok(None);
        };
        let Some((node, mut depth)) = self.position else {
            return Ok(walker.root().map(|root| (root, 0)));
        };

        let mut cursor = Cursor::new(node);
        loop {
            match walker.step(cursor)? {
                Step::Descend(next) => return Ok(Some((next, depth + 1))),
                Step::Advance(next) => return Ok(Some((next, depth))),
                Step::Ascend(parent) => {
                    depth = depth.saturating_sub(1);
                    cursor = Cursor { node: parent, descended: true };
                }
                Step::Done => return Ok(None),
            }
        }
    }
}

impl<S, P> Iterator for Nodes<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
    type Item = Result<StreamNode, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some((id, depth))) => {
                self.position = Some((id, depth));
                let walker = self.walker.as_ref()?;
                let kind = walker.document().kind(id).clone();
                Some(Ok(StreamNode { id, depth, kind }))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S, P> std::iter::FusedIterator for Nodes<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
}
