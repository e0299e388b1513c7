//! streamwalk core
//!
//! Walks a markup document while its bytes are still arriving, exposing each
//! node as soon as later input can no longer change it.
//!
//! # Architecture
//!
//! - **source.rs** - `ChunkSource` trait, adapters, streaming UTF-8 decoder
//! - **parser/** - `IncrementalParser` trait and the bundled html5ever-backed parser
//! - **dom.rs** - Arena document tree written by the parser
//! - **sync.rs** - Boundary synchronizer (sentinel or heuristic)
//! - **walker.rs** - `TreeWalker`: first child / next sibling / parent / next node
//! - **nodes.rs** - `walk_nodes`: the stream as a lazy pre-order node sequence
//! - **config.rs** - `WalkerConfig`
//! - **error.rs** - `WalkError`
//!
//! # Example
//!
//! ```
//! use streamwalk_core::{walk_nodes, IterSource};
//!
//! let chunks = ["<div class=\"foo\">", "Bar</div>"];
//! for node in walk_nodes(IterSource::new(chunks)) {
//!     let node = node.unwrap();
//!     println!("{}{}", "  ".repeat(node.depth), node.node_name());
//! }
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod nodes;
pub mod parser;
pub mod source;
mod sync;
pub mod walker;

pub use config::{BoundaryStrategy, SentinelScope, WalkerConfig};
pub use dom::{Attribute, Document, Node, NodeId, NodeKind};
pub use error::WalkError;
pub use nodes::{walk_nodes, walk_nodes_with, Nodes, StreamNode};
pub use parser::{HtmlParser, IncrementalParser};
pub use source::{ChunkSource, IterSource, ReaderSource, TryIterSource, Utf8Decoder};
pub use walker::{Cursor, Step, TreeWalker};
