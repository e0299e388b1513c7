//! Live document tree written by the parser and read by the walker.
//!
//! The tree uses an index-based arena so parent and sibling links need no
//! reference counting. Links are doubly connected (first/last child,
//! previous/next sibling), which keeps appending and detaching O(1) while a
//! stream is still growing the tree.
//!
//! # Example
//!
//! ```
//! use streamwalk_core::dom::{Document, NodeKind};
//!
//! let mut doc = Document::new();
//! let root = doc.root_id();
//! let div = doc.create(NodeKind::element("div", Vec::new()));
//! doc.append(root, div);
//! let text = doc.create(NodeKind::Text("hello".into()));
//! doc.append(div, text);
//!
//! let div = doc.node(div);
//! assert_eq!(div.name(), Some("div"));
//! assert_eq!(div.text_content(), "hello");
//! ```

use std::fmt;

// ============================================================================
// Core Types
// ============================================================================

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Internal node storage.
#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    kind: NodeKind,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        NodeData {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            kind,
        }
    }
}

/// The kind of node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root document container.
    Document,

    /// `<!DOCTYPE name>`.
    Doctype { name: String },

    /// Element with its attributes in source order.
    Element { name: String, attrs: Vec<Attribute> },

    /// Text content, character references already decoded.
    Text(String),

    /// Comment body without the `<!--` / `-->` delimiters.
    Comment(String),
}

impl NodeKind {
    /// Shorthand for an element kind.
    pub fn element(name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        NodeKind::Element { name: name.into(), attrs }
    }

    /// DOM-style node name: the tag name for elements, `#text`, `#comment`,
    /// `#document` or the doctype name otherwise.
    pub fn node_name(&self) -> &str {
        match self {
            NodeKind::Document => "#document",
            NodeKind::Doctype { name } => name,
            NodeKind::Element { name, .. } => name,
            NodeKind::Text(_) => "#text",
            NodeKind::Comment(_) => "#comment",
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute { name: name.into(), value: value.into() }
    }
}

// ============================================================================
// Document
// ============================================================================

/// A live document tree.
///
/// The arena never shrinks: detached nodes keep their slot, so a `NodeId`
/// handed out once stays valid for the lifetime of the document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Create a document holding only its root container.
    pub fn new() -> Self {
        Document { nodes: vec![NodeData::new(NodeKind::Document)] }
    }

    /// ID of the root container (the `#document` node).
    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    /// The root container as a navigation handle.
    pub fn root(&self) -> Node<'_> {
        Node { doc: self, id: self.root_id() }
    }

    /// First element child of the root container, if one exists yet.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root_id()).find(|&id| self.is_element(id))
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        if self.contains(id) {
            Some(Node { doc: self, id })
        } else {
            None
        }
    }

    /// Whether `id` names a slot of this document's arena.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Navigation handle for a node created by this document.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { doc: self, id }
    }

    /// Number of arena slots, detached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always holds its root container.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    // ---- Structure (read) ----

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).prev_sibling
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    /// Element name, `None` for every other kind.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Iterate over the children of `id`.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { doc: self, next: self.first_child(id) }
    }

    /// Iterate over `id` and its descendants in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants { doc: self, scope: id, next: Some(id) }
    }

    // ---- Structure (write) ----

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "append of an attached node");
        let prev = self.last_child(parent);
        {
            let data = self.data_mut(child);
            data.parent = Some(parent);
            data.prev_sibling = prev;
            data.next_sibling = None;
        }
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
        self.data_mut(parent).last_child = Some(child);
    }

    /// Insert a detached node right before `sibling`. No-op if `sibling` has
    /// no parent.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "insert of an attached node");
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let prev = self.prev_sibling(sibling);
        {
            let data = self.data_mut(child);
            data.parent = Some(parent);
            data.prev_sibling = prev;
            data.next_sibling = Some(sibling);
        }
        self.data_mut(sibling).prev_sibling = Some(child);
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
    }

    /// Move every child of `from` to the end of `to`, keeping their order.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        while let Some(child) = self.first_child(from) {
            self.detach(child);
            self.append(to, child);
        }
    }

    /// Unlink a node (and its subtree) from its parent. The slot stays allocated.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let prev = self.prev_sibling(id);
        let next = self.next_sibling(id);
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = next,
            None => self.data_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.data_mut(next).prev_sibling = prev,
            None => self.data_mut(parent).last_child = prev,
        }
        let data = self.data_mut(id);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    /// Extend a text node. No-op for other kinds.
    pub fn push_text(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(content) = &mut self.data_mut(id).kind {
            content.push_str(text);
        }
    }

    /// Add attributes an element does not carry yet (first occurrence wins).
    pub fn merge_attrs(&mut self, id: NodeId, extra: Vec<Attribute>) {
        if let NodeKind::Element { attrs, .. } = &mut self.data_mut(id).kind {
            for attr in extra {
                if !attrs.iter().any(|a| a.name == attr.name) {
                    attrs.push(attr);
                }
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Children of a node, in order.
pub struct Children<'doc> {
    doc: &'doc Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.next_sibling(id);
        Some(id)
    }
}

/// Pre-order walk of a subtree driven by the sibling links, no stack.
pub struct Descendants<'doc> {
    doc: &'doc Document,
    scope: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = match self.doc.first_child(id) {
            Some(child) => Some(child),
            None => {
                let mut node = id;
                loop {
                    if node == self.scope {
                        break None;
                    }
                    if let Some(sibling) = self.doc.next_sibling(node) {
                        break Some(sibling);
                    }
                    match self.doc.parent(node) {
                        Some(parent) => node = parent,
                        None => break None,
                    }
                }
            }
        };
        Some(id)
    }
}

// ============================================================================
// Node (navigation handle)
// ============================================================================

/// A lightweight handle for navigating the document tree.
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Node<'doc> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'doc NodeKind {
        self.doc.kind(self.id)
    }

    /// DOM-style node name (see [`NodeKind::node_name`]).
    pub fn node_name(&self) -> &'doc str {
        self.kind().node_name()
    }

    /// Element name, `None` for non-elements.
    pub fn name(&self) -> Option<&'doc str> {
        self.doc.element_name(self.id)
    }

    pub fn parent(&self) -> Option<Node<'doc>> {
        self.wrap(self.doc.parent(self.id))
    }

    pub fn first_child(&self) -> Option<Node<'doc>> {
        self.wrap(self.doc.first_child(self.id))
    }

    pub fn last_child(&self) -> Option<Node<'doc>> {
        self.wrap(self.doc.last_child(self.id))
    }

    pub fn next_sibling(&self) -> Option<Node<'doc>> {
        self.wrap(self.doc.next_sibling(self.id))
    }

    pub fn prev_sibling(&self) -> Option<Node<'doc>> {
        self.wrap(self.doc.prev_sibling(self.id))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'doc>> + 'doc {
        let doc = self.doc;
        doc.children(self.id).map(move |id| Node { doc, id })
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind(), NodeKind::Comment(_))
    }

    /// Get element view if this is an element.
    pub fn as_element(&self) -> Option<ElementView<'doc>> {
        if self.is_element() {
            Some(ElementView { node: *self })
        } else {
            None
        }
    }

    /// Own character data of a text or comment node.
    pub fn text(&self) -> Option<&'doc str> {
        match self.kind() {
            NodeKind::Text(s) | NodeKind::Comment(s) => Some(s),
            _ => None,
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        for id in self.doc.descendants(self.id) {
            if let NodeKind::Text(s) = self.doc.kind(id) {
                result.push_str(s);
            }
        }
        result
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<Node<'doc>> {
        id.map(|id| Node { doc: self.doc, id })
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

// ============================================================================
// ElementView (typed access to elements)
// ============================================================================

/// A typed view for element nodes.
#[derive(Clone, Copy)]
pub struct ElementView<'doc> {
    node: Node<'doc>,
}

impl<'doc> ElementView<'doc> {
    pub fn node(&self) -> Node<'doc> {
        self.node
    }

    pub fn name(&self) -> &'doc str {
        self.node.name().unwrap_or_default()
    }

    fn attr_list(&self) -> &'doc [Attribute] {
        match self.node.kind() {
            NodeKind::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&'doc str> {
        self.attr_list()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterate over all attributes in source order.
    pub fn attrs(&self) -> impl Iterator<Item = (&'doc str, &'doc str)> {
        self.attr_list()
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
    }

    pub fn id(&self) -> Option<&'doc str> {
        self.attr("id")
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &'doc str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

impl fmt::Debug for ElementView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementView")
            .field("name", &self.name())
            .field("attrs", &self.attr_list())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
