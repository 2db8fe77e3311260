//! Basic HTML5 rendering of the node tree.
//!
//! This is the parser's built-in converter: semantic, convention-free HTML
//! for every node kind. The block-convention renderer delegates to it for
//! kinds it does not handle, and the `html5` backend uses it for the whole
//! document.

use std::fmt::Write;

use crate::node::{Document, Node, NodeKind, Row};

/// Escape text for use in HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain HTML5 renderer bound to a document.
pub struct BasicHtml<'a> {
    document: &'a Document,
}

impl<'a> BasicHtml<'a> {
    /// Create a renderer for nodes of `document`.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Render a node and its subtree.
    #[must_use]
    pub fn render(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_blocks(&self, blocks: &[Node], out: &mut String) {
        for block in blocks {
            self.write_node(block, out);
        }
    }

    fn write_inlines(&self, inlines: &[Node], out: &mut String) {
        for inline in inlines {
            self.write_node(inline, out);
        }
    }

    fn write_block_title(node: &Node, out: &mut String) {
        if let Some(title) = node.title.as_deref().filter(|t| !t.is_empty()) {
            write!(out, r#"<div class="title">{}</div>"#, escape_html(title)).unwrap();
        }
    }

    #[allow(clippy::too_many_lines)]
    fn write_node(&self, node: &Node, out: &mut String) {
        match &node.kind {
            NodeKind::Document => {
                if let Some(title) = node.title.as_deref()
                    && !self.document.has_attr("notitle")
                {
                    write!(out, "<h1>{}</h1>", escape_html(title)).unwrap();
                }
                self.write_blocks(&node.blocks, out);
            }
            NodeKind::Section => {
                let rank = (node.level + 1).min(6);
                out.push_str("<section>");
                match &node.id {
                    Some(id) => write!(out, r#"<h{rank} id="{}">"#, escape_html(id)).unwrap(),
                    None => write!(out, "<h{rank}>").unwrap(),
                }
                out.push_str(&escape_html(node.title.as_deref().unwrap_or_default()));
                write!(out, "</h{rank}>").unwrap();
                self.write_blocks(&node.blocks, out);
                out.push_str("</section>");
            }
            NodeKind::Paragraph => {
                Self::write_block_title(node, out);
                out.push_str("<p>");
                self.write_inlines(&node.inlines, out);
                out.push_str("</p>");
            }
            NodeKind::OrderedList | NodeKind::UnorderedList => {
                let tag = if node.kind == NodeKind::OrderedList {
                    "ol"
                } else {
                    "ul"
                };
                Self::write_block_title(node, out);
                write!(out, "<{tag}>").unwrap();
                self.write_blocks(&node.blocks, out);
                write!(out, "</{tag}>").unwrap();
            }
            NodeKind::ListItem => {
                out.push_str("<li>");
                if !node.inlines.is_empty() {
                    out.push_str("<p>");
                    self.write_inlines(&node.inlines, out);
                    out.push_str("</p>");
                }
                self.write_blocks(&node.blocks, out);
                out.push_str("</li>");
            }
            NodeKind::DescriptionList => {
                Self::write_block_title(node, out);
                out.push_str("<dl>");
                for entry in &node.entries {
                    for term in &entry.terms {
                        out.push_str("<dt>");
                        self.write_inlines(&term.inlines, out);
                        out.push_str("</dt>");
                    }
                    if let Some(description) = &entry.description {
                        out.push_str("<dd>");
                        if !description.inlines.is_empty() {
                            out.push_str("<p>");
                            self.write_inlines(&description.inlines, out);
                            out.push_str("</p>");
                        }
                        self.write_blocks(&description.blocks, out);
                        out.push_str("</dd>");
                    }
                }
                out.push_str("</dl>");
            }
            NodeKind::Table => self.write_table(node, out),
            NodeKind::Image => {
                let target = node.target.as_deref().unwrap_or_default();
                let alt = node.attr("alt").unwrap_or_default();
                write!(
                    out,
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(target),
                    escape_html(alt)
                )
                .unwrap();
            }
            NodeKind::Admonition => {
                let style = node.style.as_deref().unwrap_or("note");
                write!(
                    out,
                    r#"<div class="admonitionblock {}"><div class="label">{}</div>"#,
                    escape_html(&style.to_lowercase()),
                    escape_html(style)
                )
                .unwrap();
                Self::write_block_title(node, out);
                self.write_blocks(&node.blocks, out);
                out.push_str("</div>");
            }
            NodeKind::Literal | NodeKind::Listing => {
                Self::write_block_title(node, out);
                write!(
                    out,
                    "<pre>{}</pre>",
                    escape_html(node.text.as_deref().unwrap_or_default())
                )
                .unwrap();
            }
            NodeKind::ThematicBreak => out.push_str("<hr>"),
            NodeKind::InlineQuoted => {
                let tag = match node.style.as_deref() {
                    Some("strong") => Some("strong"),
                    Some("emphasis") => Some("em"),
                    Some("monospaced") => Some("code"),
                    Some("mark") => Some("mark"),
                    Some("superscript") => Some("sup"),
                    Some("subscript") => Some("sub"),
                    _ => None,
                };
                if let Some(tag) = tag {
                    write!(out, "<{tag}>").unwrap();
                }
                self.write_inlines(&node.inlines, out);
                if let Some(tag) = tag {
                    write!(out, "</{tag}>").unwrap();
                }
            }
            NodeKind::InlineAnchor => {
                let target = node.target.as_deref().unwrap_or_default();
                write!(out, r#"<a href="{}">"#, escape_html(target)).unwrap();
                if node.inlines.is_empty() {
                    out.push_str(&escape_html(target));
                } else {
                    self.write_inlines(&node.inlines, out);
                }
                out.push_str("</a>");
            }
            NodeKind::FloatingTitle => {
                let rank = (node.level + 1).min(6);
                write!(
                    out,
                    r#"<h{rank} class="discrete">{}</h{rank}>"#,
                    escape_html(node.title.as_deref().unwrap_or_default())
                )
                .unwrap();
            }
            NodeKind::Embedded => self.write_blocks(&node.blocks, out),
            NodeKind::Text => out.push_str(&escape_html(node.text.as_deref().unwrap_or_default())),
            NodeKind::Outline => self.write_outline(out),
            NodeKind::Other(name) => self.write_other(name, node, out),
        }
    }

    fn write_other(&self, name: &str, node: &Node, out: &mut String) {
        match name {
            "pass" => out.push_str(node.text.as_deref().unwrap_or_default()),
            "page_break" => out.push_str(r#"<div style="page-break-after: always;"></div>"#),
            "sidebar" => {
                out.push_str(r#"<aside class="sidebarblock">"#);
                Self::write_block_title(node, out);
                self.write_blocks(&node.blocks, out);
                out.push_str("</aside>");
            }
            "quote" => {
                out.push_str("<blockquote>");
                self.write_blocks(&node.blocks, out);
                if let Some(attribution) = node.attr("attribution") {
                    write!(out, "<footer>{}</footer>", escape_html(attribution)).unwrap();
                }
                out.push_str("</blockquote>");
            }
            _ => {
                write!(out, r#"<div class="{}block">"#, escape_html(name)).unwrap();
                Self::write_block_title(node, out);
                self.write_inlines(&node.inlines, out);
                self.write_blocks(&node.blocks, out);
                out.push_str("</div>");
            }
        }
    }

    fn write_table(&self, node: &Node, out: &mut String) {
        out.push_str("<table>");
        if let Some(title) = node.title.as_deref().filter(|t| !t.is_empty()) {
            write!(out, "<caption>{}</caption>", escape_html(title)).unwrap();
        }
        if let Some(table) = &node.table {
            self.write_rows("thead", "th", &table.head, out);
            self.write_rows("tbody", "td", &table.body, out);
            self.write_rows("tfoot", "td", &table.foot, out);
        }
        out.push_str("</table>");
    }

    fn write_rows(&self, group: &str, cell_tag: &str, rows: &[Row], out: &mut String) {
        if rows.is_empty() {
            return;
        }
        write!(out, "<{group}>").unwrap();
        for row in rows {
            out.push_str("<tr>");
            for cell in row {
                write!(out, "<{cell_tag}>").unwrap();
                self.write_inlines(&cell.inlines, out);
                self.write_blocks(&cell.blocks, out);
                write!(out, "</{cell_tag}>").unwrap();
            }
            out.push_str("</tr>");
        }
        write!(out, "</{group}>").unwrap();
    }

    fn write_outline(&self, out: &mut String) {
        out.push_str(r#"<nav class="toc"><ul>"#);
        for section in self
            .document
            .root
            .blocks
            .iter()
            .filter(|b| b.kind == NodeKind::Section)
        {
            let title = escape_html(section.title.as_deref().unwrap_or_default());
            match &section.id {
                Some(id) => {
                    write!(out, r##"<li><a href="#{}">{title}</a></li>"##, escape_html(id)).unwrap();
                }
                None => write!(out, "<li>{title}</li>").unwrap(),
            }
        }
        out.push_str("</ul></nav>");
    }
}
