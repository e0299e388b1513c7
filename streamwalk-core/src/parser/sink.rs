//! html5ever tree sink writing into the arena [`Document`].
//!
//! Besides mirroring the tree builder's operations, the sink remembers the
//! few things the walker's boundary marker needs: which text node a later
//! append may still extend, whether a raw text element is open, and which
//! node was created last.

use std::borrow::Cow;
use std::collections::HashMap;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as HtmlAttribute, ExpandedName, LocalName, Namespace, QualName};
use phf::{phf_set, Set};

use crate::dom::{Attribute, Document, NodeId, NodeKind};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements the tree builder reads in its text mode. No token other than
/// character data and the element's end tag reaches it while one is open.
static RAW_TEXT: Set<&'static str> = phf_set! {
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript",
    "title", "textarea",
};

#[derive(Debug)]
pub(crate) struct DomSink {
    pub(crate) doc: Document,
    /// Qualified names of elements, for the tree builder's name lookups
    names: HashMap<NodeId, QualName>,
    /// Answer for handles that are not elements
    no_name: QualName,
    /// Text node the next text append may extend
    open_text: Option<NodeId>,
    /// Raw text element currently open
    raw_text: Option<NodeId>,
    last_created: Option<NodeId>,
    quirks_mode: QuirksMode,
}

impl DomSink {
    pub(crate) fn new() -> Self {
        DomSink {
            doc: Document::new(),
            names: HashMap::new(),
            no_name: QualName::new(None, Namespace::from(""), LocalName::from("")),
            open_text: None,
            raw_text: None,
            last_created: None,
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    pub(crate) fn raw_text(&self) -> Option<NodeId> {
        self.raw_text
    }

    pub(crate) fn last_created(&self) -> Option<NodeId> {
        self.last_created
    }

    pub(crate) fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Append a comment as the last child of `parent`.
    pub(crate) fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create(NodeKind::Comment(text.to_string()));
        self.doc.append(parent, id);
        self.open_text = None;
        id
    }

    /// Remove a node the tree builder does not track (the boundary marker).
    ///
    /// Text arriving afterwards starts a new node instead of extending the
    /// one the marker followed.
    pub(crate) fn detach(&mut self, id: NodeId) {
        self.doc.detach(id);
        self.open_text = None;
    }

    /// Move a comment that the after-body modes put into `html` or the
    /// document down to where further content goes.
    ///
    /// After `</body>` any text or element is still inserted into the open
    /// elements, which sit on the body's last-child chain. The marker goes to
    /// the end of the deepest element on that chain.
    pub(crate) fn place_after_body(&mut self, marker: NodeId) {
        let Some(parent) = self.doc.parent(marker) else {
            return;
        };
        let Some(html) = self.doc.document_element() else {
            return;
        };
        if parent != html && parent != self.doc.root_id() {
            return;
        }
        let body = self
            .doc
            .children(html)
            .filter(|&id| self.doc.element_name(id) == Some("body"))
            .last();
        let Some(mut target) = body else {
            return;
        };
        while let Some(last) = self.doc.last_child(target).filter(|&id| self.doc.is_element(id)) {
            target = last;
        }
        log::trace!("boundary after body moved into {:?}", target);
        self.doc.detach(marker);
        self.doc.append(target, marker);
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = self.doc.create(kind);
        self.last_created = Some(id);
        id
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.create(NodeKind::Text(text.to_string()));
        self.open_text = Some(id);
        id
    }
}

impl Default for DomSink {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_attrs(attrs: Vec<HtmlAttribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|attr| {
            let name = match &attr.name.prefix {
                Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                None => attr.name.local.to_string(),
            };
            Attribute::new(name, attr.value.to_string())
        })
        .collect()
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        log::trace!("html parse error: {}", msg);
    }

    fn get_document(&mut self) -> NodeId {
        self.doc.root_id()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        self.names.get(target).unwrap_or(&self.no_name).expanded()
    }

    fn create_element(&mut self, name: QualName, attrs: Vec<HtmlAttribute>, _flags: ElementFlags) -> NodeId {
        let id = self.create(NodeKind::element(name.local.to_string(), convert_attrs(attrs)));
        if &*name.ns == HTML_NAMESPACE && RAW_TEXT.contains(&*name.local) {
            self.raw_text = Some(id);
        }
        self.names.insert(id, name);
        id
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.create(NodeKind::Comment(text.to_string()))
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> NodeId {
        // Only reachable from XML parsing.
        self.create(NodeKind::Comment(format!("?{} {}", target, data)))
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => {
                self.doc.detach(node);
                self.doc.append(*parent, node);
                self.open_text = None;
            }
            NodeOrText::AppendText(text) => {
                if let Some(open) = self.open_text {
                    if self.doc.last_child(*parent) == Some(open) {
                        self.doc.push_text(open, &text);
                        return;
                    }
                }
                let id = self.create_text(&text);
                self.doc.append(*parent, id);
            }
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.doc.parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&mut self, name: StrTendril, _public_id: StrTendril, _system_id: StrTendril) {
        let id = self.create(NodeKind::Doctype { name: name.to_string() });
        let root = self.doc.root_id();
        self.doc.append(root, id);
        self.open_text = None;
    }

    fn pop(&mut self, node: &NodeId) {
        if self.raw_text == Some(*node) {
            self.raw_text = None;
        }
    }

    /// Template contents are kept as the template's own children.
    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    fn append_before_sibling(&mut self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        match new_node {
            NodeOrText::AppendNode(node) => {
                self.doc.detach(node);
                self.doc.insert_before(*sibling, node);
                self.open_text = None;
            }
            NodeOrText::AppendText(text) => {
                if let Some(open) = self.open_text {
                    if self.doc.prev_sibling(*sibling) == Some(open) {
                        self.doc.push_text(open, &text);
                        return;
                    }
                }
                let id = self.create_text(&text);
                self.doc.insert_before(*sibling, id);
            }
        }
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<HtmlAttribute>) {
        self.doc.merge_attrs(*target, convert_attrs(attrs));
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.doc.detach(*target);
        self.open_text = None;
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        self.doc.reparent_children(*node, *new_parent);
        self.open_text = None;
    }
}
