//! Depth-first traversal over a tree that is still streaming in.
//!
//! Every query that reads a structural link first asks the synchronizer to
//! settle it, which may block on the chunk source. Ancestors never change, so
//! [`TreeWalker::parent`] answers straight from the tree.

use crate::config::WalkerConfig;
use crate::dom::{Document, Node, NodeId};
use crate::error::WalkError;
use crate::nodes::Nodes;
use crate::parser::{HtmlParser, IncrementalParser};
use crate::source::ChunkSource;
use crate::sync::{Link, Synchronizer};

/// Position of a document-order traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub node: NodeId,
    /// The descendants of `node` have been visited already.
    pub descended: bool,
}

impl Cursor {
    pub fn new(node: NodeId) -> Self {
        Cursor { node, descended: false }
    }
}

/// One move of the document-order step function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the first child.
    Descend(NodeId),
    /// Moved to the next sibling.
    Advance(NodeId),
    /// No sibling left; moved back up to the parent.
    Ascend(NodeId),
    /// Back at the root: traversal is over.
    Done,
}

/// Walks a live document, pulling chunks from `S` on demand.
///
/// A link is read only once later input can no longer change it, with two
/// exceptions the HTML tree builder forces:
///
/// - A repeated `<html>` or `<body>` start tag adds its attributes to the
///   existing element when they are missing there. Names and links never
///   change, but an attribute may appear on an element already exposed.
/// - Under [`SentinelScope::Link`](crate::SentinelScope::Link) a node may be
///   exposed while still among the open elements. Foster parenting (content
///   misplaced in a table) and the adoption agency (misnested formatting
///   tags) may later move such a node or its children.
///   [`SentinelScope::Subtree`](crate::SentinelScope::Subtree) waits until
///   they are closed and is not affected.
///
/// Ids from another walker's document are answered with `None` when they lie
/// outside this document's arena.
///
/// ```
/// use streamwalk_core::{IterSource, TreeWalker};
///
/// let mut walker = TreeWalker::new(IterSource::new(["<ul><li>a", "<li>b</ul>"])).unwrap();
/// let html = walker.root();
/// let head = walker.first_child(html).unwrap();
/// let body = walker.next_sibling(head).unwrap();
/// let ul = walker.first_child(body).unwrap();
/// let li = walker.first_child(ul).unwrap();
/// assert_eq!(walker.node(li.unwrap()).text_content(), "a");
/// ```
#[derive(Debug)]
pub struct TreeWalker<S, P = HtmlParser> {
    sync: Synchronizer<S, P>,
    root: Option<NodeId>,
}

impl<S: ChunkSource> TreeWalker<S, HtmlParser> {
    /// Start walking `source` with the bundled parser and default settings.
    ///
    /// Blocks until the first chunk (and, if needed, enough further chunks
    /// to produce the document element) has been read.
    pub fn new(source: S) -> Result<Self, WalkError> {
        Self::with_config(source, WalkerConfig::default())
    }

    pub fn with_config(source: S, config: WalkerConfig) -> Result<Self, WalkError> {
        Self::with_parser(source, HtmlParser::new(), config)
    }
}

impl<S, P> TreeWalker<S, P>
where
    S: ChunkSource,
    P: IncrementalParser,
{
    /// Start walking `source` with any incremental parser.
    pub fn with_parser(source: S, parser: P, config: WalkerConfig) -> Result<Self, WalkError> {
        let mut sync = Synchronizer::new(source, parser, config);

        let root = if sync.pull()? {
            loop {
                if let Some(root) = sync.document().document_element() {
                    break Some(root);
                }
                if !sync.pull()? {
                    break sync.document().document_element();
                }
            }
        } else {
            // An empty stream has no root, even though finishing the parser
            // synthesized one.
            None
        };

        log::debug!("root {:?} after {} chunk(s)", root, sync.chunks_read());
        Ok(TreeWalker { sync, root })
    }

    /// The document element, or `None` for an empty stream.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// First child of `node`, once it is final.
    pub fn first_child(&mut self, node: Option<NodeId>) -> Result<Option<NodeId>, WalkError> {
        self.read_link(node, Link::FirstChild)
    }

    /// Next sibling of `node`, once it is final.
    pub fn next_sibling(&mut self, node: Option<NodeId>) -> Result<Option<NodeId>, WalkError> {
        self.read_link(node, Link::NextSibling)
    }

    fn read_link(&mut self, node: Option<NodeId>, link: Link) -> Result<Option<NodeId>, WalkError> {
        let Some(node) = node.filter(|&id| self.sync.document().contains(id)) else {
            return Ok(None);
        };
        self.sync.resolve(node, link)?;
        let target = self.sync.follow(node, link);
        log::trace!("{:?} of {:?}: {:?}", link, node, target);
        Ok(target)
    }

    /// Parent of `node`. `None` for the root and for nodes outside the tree.
    pub fn parent(&self, node: Option<NodeId>) -> Option<NodeId> {
        let node = node.filter(|&id| self.sync.document().contains(id))?;
        if Some(node) == self.root {
            return None;
        }
        self.sync.document().parent(node)
    }

    /// Take one step of document order from `cursor`.
    ///
    /// The root's siblings are never consulted: once the walk returns to the
    /// root it is [`Step::Done`].
    pub fn step(&mut self, cursor: Cursor) -> Result<Step, WalkError> {
        if !cursor.descended {
            if let Some(child) = self.first_child(Some(cursor.node))? {
                return Ok(Step::Descend(child));
            }
        }
        if Some(cursor.node) == self.root {
            return Ok(Step::Done);
        }
        if let Some(next) = self.next_sibling(Some(cursor.node))? {
            return Ok(Step::Advance(next));
        }
        Ok(match self.parent(Some(cursor.node)) {
            Some(parent) => Step::Ascend(parent),
            None => Step::Done,
        })
    }

    /// The node after `node` in pre-order, within the root's subtree.
    pub fn next_node(&mut self, node: Option<NodeId>) -> Result<Option<NodeId>, WalkError> {
        let Some(node) = node else {
            return Ok(None);
        };
        let mut cursor = Cursor::new(node);
        loop {
            match self.step(cursor)? {
                Step::Descend(next) | Step::Advance(next) => return Ok(Some(next)),
                Step::Ascend(parent) => cursor = Cursor { node: parent, descended: true },
                Step::Done => return Ok(None),
            }
        }
    }

    /// Borrow a node of the live tree.
    ///
    /// Links read through the view bypass synchronization; walk with
    /// [`first_child`](Self::first_child) and friends instead.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this walker's document.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        self.sync.document().node(id)
    }

    /// The live document.
    pub fn document(&self) -> &Document {
        self.sync.document()
    }

    /// Whether the source has reported end-of-stream.
    pub fn is_finished(&self) -> bool {
        self.sync.is_ended()
    }

    pub fn chunks_read(&self) -> usize {
        self.sync.chunks_read()
    }

    pub fn bytes_read(&self) -> u64 {
        self.sync.bytes_read()
    }

    pub fn config(&self) -> &WalkerConfig {
        self.sync.config()
    }

    /// Continue as a node sequence, starting with the root.
    pub fn into_nodes(self) -> Nodes<S, P> {
        Nodes::from_walker(self)
    }
}
