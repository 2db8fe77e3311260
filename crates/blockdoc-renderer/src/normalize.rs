//! Final HTML fix-up pass and page scaffold.
//!
//! The assembled HTML is reparsed with html5ever so the output is a
//! well-formed fragment. Lists at the top level of the fragment are wrapped
//! in a `<div>`, since the site pipeline only recognizes `<div>` children of
//! the root as sections.

use std::fmt::Write;
use std::io;

use blockdoc_asciidoc::escape_html;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::ConvertError;

/// Stylesheets and scripts linked from the full-page scaffold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageScaffold {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl Default for PageScaffold {
    fn default() -> Self {
        Self {
            stylesheets: vec!["/styles/styles.css".to_owned()],
            scripts: vec!["/scripts/aem.js".to_owned(), "/scripts/scripts.js".to_owned()],
        }
    }
}

impl PageScaffold {
    /// Embed a fragment into a full page with a single `<main>`.
    #[must_use]
    pub fn render(&self, title: Option<&str>, fragment: &str) -> String {
        let mut out = String::with_capacity(fragment.len() + 512);
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        writeln!(out, "<title>{}</title>", escape_html(title.unwrap_or_default())).unwrap();
        out.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
        out.push('\n');
        for script in &self.scripts {
            writeln!(
                out,
                r#"<script src="{}" type="module"></script>"#,
                escape_html(script)
            )
            .unwrap();
        }
        for stylesheet in &self.stylesheets {
            writeln!(out, r#"<link rel="stylesheet" href="{}">"#, escape_html(stylesheet)).unwrap();
        }
        out.push_str("</head>\n<body>\n<header></header>\n");
        writeln!(out, "<main>{fragment}</main>").unwrap();
        out.push_str("<footer></footer>\n</body>\n</html>\n");
        out
    }
}

/// Reparse an HTML fragment, wrapping top-level `<ol>`/`<ul>` in a `<div>`.
///
/// # Errors
///
/// Returns [`ConvertError::Serialize`] if the tree cannot be serialized.
pub fn normalize_fragment(html: &str) -> Result<String, ConvertError> {
    let document = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(document.as_bytes());

    let Some(body) = find_element(&dom.document, "body") else {
        return Ok(html.to_owned());
    };

    let mut out = String::with_capacity(html.len() + 64);
    for child in body.children.borrow().iter() {
        let wrap = is_element(child, "ol") || is_element(child, "ul");
        if wrap {
            out.push_str("<div>");
        }
        out.push_str(&serialize_node(child)?);
        if wrap {
            out.push_str("</div>");
        }
    }
    Ok(out)
}

fn is_element(handle: &Handle, name: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name: qname, .. } if &*qname.local == name)
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if is_element(handle, name) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

fn serialize_node(handle: &Handle) -> Result<String, ConvertError> {
    let mut bytes = Vec::new();
    let serializable = SerializableHandle::from(handle.clone());
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut bytes, &serializable, opts)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
