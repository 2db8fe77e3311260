//! Block-convention HTML renderer.
//!
//! Converts a parsed AsciiDoc [`Document`](blockdoc_asciidoc::Document) into
//! flat `<div>` trees that a static-site pipeline recognizes as blocks:
//! tables, admonitions, procedures, fragments and images.
//!
//! # Architecture
//!
//! - [`Converter`] dispatches every node on its [`NodeKind`](blockdoc_asciidoc::NodeKind)
//!   to a per-kind rule. Kinds without a rule fall back to the parser's basic
//!   HTML renderer.
//! - Sections are rendered into [`Containers`]: balanced sibling container
//!   bodies that the parent merges, so no tags are left open across calls.
//! - Links, includes and images are rewritten by the functions in [`links`]
//!   and resolved to site URLs through a [`Book`].
//! - [`normalize_fragment`] reparses the assembled HTML, wraps top-level lists
//!   and the result is emitted bare or inside a [`PageScaffold`].
//!
//! # Example
//!
//! ```
//! use blockdoc_renderer::{ConvertOptions, SiteBook, convert};
//!
//! let book = SiteBook::new("https://docs.example.com");
//! let options = ConvertOptions::new(&book, "guide/intro.adoc").with_plain(true);
//! let html = convert("NOTE: Read this first.", &options).unwrap();
//! assert!(html.contains(r#"<div class="admonition note">"#));
//! ```

mod block;
mod book;
mod context;
mod convert;
mod converter;
mod error;
mod kinds;
pub mod links;
mod normalize;
mod table;

pub use block::{BlockName, make_block, normalize_identifier, parse_block_name};
pub use book::{Book, SiteBook};
pub use context::{Containers, RenderContext};
pub use convert::{Backend, ConvertOptions, convert, convert_with};
pub use converter::Converter;
pub use error::ConvertError;
pub use links::join_topic_path;
pub use normalize::{PageScaffold, normalize_fragment};
pub use table::{flatten_rows, titled_block};
