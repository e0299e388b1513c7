//! Incremental markup parsing.
//!
//! The walker only needs a parser that accepts text in fragments, keeps a
//! live [`Document`] up to date after every fragment, and lets a node be
//! removed again. [`IncrementalParser`] is that seam; [`HtmlParser`] is the
//! bundled implementation.

mod sink;

use std::fmt;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tokenizer::{Token, TokenSink};
use html5ever::tree_builder::QuirksMode;
use html5ever::{parse_document, ParseOpts, Parser};

use crate::dom::{Document, NodeId, NodeKind};
use sink::DomSink;

/// A tolerant parser that can be fed one fragment at a time.
///
/// After each [`write`](Self::write) the document reflects everything parsed
/// so far. Input that cannot be interpreted yet (half a tag) may be held back.
pub trait IncrementalParser {
    /// The live tree.
    fn document(&self) -> &Document;

    /// Parse a fragment of markup.
    fn write(&mut self, text: &str);

    /// Insert a comment node with `payload` at the current insertion point.
    ///
    /// The default writes `<!--payload-->` as markup, which is what any
    /// parser without a direct tree-building hook can do. It is only exact
    /// when fragments never end inside a tag.
    fn write_marker(&mut self, payload: &str) {
        self.write(&format!("<!--{payload}-->"));
    }

    /// Remove a node from the tree.
    fn detach(&mut self, node: NodeId);

    /// End of input: flush anything held back and complete the tree.
    fn finish(&mut self);
}

enum State {
    Parsing(Box<Parser<DomSink>>),
    Finished(DomSink),
}

/// The bundled HTML parser: html5ever's tokenizer and tree builder writing
/// into a [`Document`].
///
/// ```
/// use streamwalk_core::parser::{HtmlParser, IncrementalParser};
///
/// let mut parser = HtmlParser::new();
/// parser.write("<ul><li>one<li>tw");
/// parser.write("o</ul>");
/// parser.finish();
///
/// let doc = parser.document();
/// let body = doc.node(doc.document_element().unwrap()).last_child().unwrap();
/// assert_eq!(body.text_content(), "onetwo");
/// ```
pub struct HtmlParser {
    state: State,
}

impl HtmlParser {
    pub fn new() -> Self {
        let parser = parse_document(DomSink::new(), ParseOpts::default());
        HtmlParser { state: State::Parsing(Box::new(parser)) }
    }

    /// Parse a complete document in one go.
    pub fn parse_str(input: &str) -> Document {
        let mut parser = HtmlParser::new();
        parser.write(input);
        parser.into_document()
    }

    /// Finish parsing and hand out the tree.
    pub fn into_document(mut self) -> Document {
        self.finish();
        match self.state {
            State::Finished(sink) => sink.doc,
            State::Parsing(parser) => (*parser).finish().doc,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Quirks mode the doctype (or its absence) selected.
    pub fn quirks_mode(&self) -> QuirksMode {
        self.sink().quirks_mode()
    }

    fn sink(&self) -> &DomSink {
        match &self.state {
            State::Parsing(parser) => &parser.tokenizer.sink.sink,
            State::Finished(sink) => sink,
        }
    }

    fn sink_mut(&mut self) -> &mut DomSink {
        match &mut self.state {
            State::Parsing(parser) => &mut parser.tokenizer.sink.sink,
            State::Finished(sink) => sink,
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlParser")
            .field("nodes", &self.document().len())
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl IncrementalParser for HtmlParser {
    fn document(&self) -> &Document {
        &self.sink().doc
    }

    fn write(&mut self, text: &str) {
        if let State::Parsing(parser) = &mut self.state {
            parser.process(StrTendril::from_slice(text));
        }
    }

    /// Hands a comment token straight to the tree builder, so a tag the
    /// tokenizer is still holding back is not disturbed.
    fn write_marker(&mut self, payload: &str) {
        let State::Parsing(parser) = &mut self.state else {
            return;
        };
        let builder = &mut parser.tokenizer.sink;
        if let Some(raw) = builder.sink.raw_text() {
            // Inside raw text the tree builder accepts no comment token; the
            // open element is where the next text goes anyway.
            builder.sink.append_comment(raw, payload);
            return;
        }
        let _ = builder.process_token(Token::CommentToken(StrTendril::from_slice(payload)), 0);
        let marker = builder
            .sink
            .last_created()
            .filter(|&id| matches!(builder.sink.doc.kind(id), NodeKind::Comment(c) if c == payload));
        if let Some(marker) = marker {
            builder.sink.place_after_body(marker);
        }
    }

    fn detach(&mut self, node: NodeId) {
        self.sink_mut().detach(node);
    }

    fn finish(&mut self) {
        if !matches!(self.state, State::Parsing(_)) {
            return;
        }
        let done = State::Finished(DomSink::new());
        if let State::Parsing(parser) = std::mem::replace(&mut self.state, done) {
            self.state = State::Finished((*parser).finish());
        }
    }
}
