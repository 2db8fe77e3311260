//! AsciiDoc node tree, parser and basic HTML renderer.
//!
//! This crate is the markup side of blockdoc. It turns source text into a
//! [`Document`] of typed [`Node`]s and offers a plain HTML5 rendering of any
//! node, used as the fallback for node kinds the block-convention renderer
//! does not handle.
//!
//! The parser covers the subset of AsciiDoc that the block convention maps:
//! document header and attribute entries, sections, paragraphs, admonitions,
//! lists (ordered, unordered, description), delimited blocks, tables, block
//! images, includes and the usual inline formatting and links.
//!
//! # Example
//!
//! ```
//! use blockdoc_asciidoc::{AsciiDocParser, Attributes, MarkupParser, NodeKind};
//!
//! let doc = AsciiDocParser::new()
//!     .parse("= Guide\n\n== Setup\n\nInstall it.", &Attributes::new())
//!     .unwrap();
//! assert_eq!(doc.title(), Some("Guide"));
//! assert_eq!(doc.root.blocks[0].kind, NodeKind::Section);
//! ```

mod error;
mod html;
mod node;
mod parser;

pub use error::ParseError;
pub use html::{BasicHtml, escape_html};
pub use node::{Attributes, Cell, DescriptionEntry, Document, Node, NodeKind, Row, Table};
pub use parser::AsciiDocParser;

/// A markup parser and its built-in HTML rendering.
///
/// Implementations own tokenizing and tree building; the block-convention
/// renderer only consumes the resulting tree and falls back to
/// [`render_basic`](Self::render_basic) for kinds it does not know.
pub trait MarkupParser: Send + Sync {
    /// Parse source text into a document.
    ///
    /// `attributes` override document attributes declared in the header.
    fn parse(&self, source: &str, attributes: &Attributes) -> Result<Document, ParseError>;

    /// Render a node with the parser's default HTML rules.
    fn render_basic(&self, node: &Node, document: &Document) -> String;
}
