//! cfgshift Document Model
//!
//! Hierarchical YAML documents held as an ordered tree of sections, with
//! comments carried on every entry.
//!
//! # Core Concepts
//!
//! - [`Route`]: Non-empty key path addressing a block from a section
//! - [`Block`]: Either a [`Terminal`] value or a nested [`Section`]
//! - [`Comments`]: Before/inline/after comment slots for an entry's key and value
//! - [`Node`]: Tagged, commented node graph at the parser/emitter boundary
//! - [`Codec`]: Construction of blocks from nodes and representation back
//! - [`TypeAdapter`]: Conversion for custom YAML tags
//! - [`Document`]: Root section plus [`DocumentSettings`], loadable and dumpable
//!
//! # Comments
//!
//! [`Document::load`] keeps comment lines, blank lines and trailing `#`
//! comments around block-style mapping entries, and [`Document::dump`] writes
//! them back in place. Comments inside sequences move to the next mapping
//! entry; those inside block scalars and multi-line flow collections are
//! dropped.
//!
//! # Example
//!
//! ```rust
//! use cfgshift_document::{Document, DocumentSettings};
//!
//! let mut doc = Document::load("server:\n  port: 8080\n", DocumentSettings::new())?;
//! let port = doc.route("server.port")?;
//! doc.set(&port, 9090)?;
//! assert_eq!(doc.dump()?, "server:\n  port: 9090\n");
//!
//! let commented = Document::load("# listener\nport: 80 # tcp\n", DocumentSettings::new())?;
//! assert_eq!(commented.dump()?, "# listener\nport: 80 # tcp\n");
//! # Ok::<(), cfgshift_document::DocumentError>(())
//! ```

mod block;
mod codec;
mod comments;
mod document;
mod emit;
mod error;
mod node;
mod reader;
mod route;
mod section;
mod settings;
mod types;

pub use block::{Block, Terminal};
pub use codec::Codec;
pub use comments::{Comment, CommentSet, Comments, NodeRole, Position};
pub use document::Document;
pub use error::{DocumentError, DocumentResult};
pub use node::{normalize_tag, tagged, Node, NodeKind};
pub use route::{key_to_string, Key, Route, RouteError, DEFAULT_SEPARATOR};
pub use section::Section;
pub use settings::{DocumentSettings, KeyFormat};
pub use types::{AdapterError, TypeAdapter, TypeRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
