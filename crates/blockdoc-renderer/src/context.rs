//! Per-call render context and section container accumulation.

use blockdoc_asciidoc::Document;

/// Read-only state threaded through every render call.
///
/// Nested sections get a fresh context from [`RenderContext::nested`], so a
/// caller's depth is never changed by rendering a subtree.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    document: &'a Document,
    depth: usize,
}

impl<'a> RenderContext<'a> {
    /// Context for the top level of `document`.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self { document, depth: 0 }
    }

    /// Document being converted.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Section nesting depth; 0 outside any section.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for the children of a section.
    #[must_use]
    pub fn nested(&self) -> Self {
        Self {
            document: self.document,
            depth: self.depth + 1,
        }
    }

    /// Whether the document enables admonition icons.
    #[must_use]
    pub fn icons_enabled(&self) -> bool {
        self.document.has_attr("icons")
    }
}

/// Sibling container bodies produced by a section subtree.
///
/// The last body is the open one; content is appended to it. Each body is
/// balanced HTML, and the document root wraps every non-empty body in a
/// `<div>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Containers {
    bodies: Vec<String>,
}

impl Default for Containers {
    fn default() -> Self {
        Self::new()
    }
}

impl Containers {
    /// One open, empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: vec![String::new()],
        }
    }

    /// Append content to the open container.
    pub fn push_str(&mut self, html: &str) {
        if let Some(open) = self.bodies.last_mut() {
            open.push_str(html);
        }
    }

    /// Close the open container and start a new sibling.
    pub fn open_new(&mut self) {
        self.bodies.push(String::new());
    }

    /// Merge a child section's containers: its first body continues the open
    /// container, the others follow as siblings.
    pub fn merge(&mut self, child: Containers) {
        let mut bodies = child.bodies.into_iter();
        if let Some(first) = bodies.next() {
            self.push_str(&first);
        }
        self.bodies.extend(bodies);
    }

    /// Container bodies in order.
    #[must_use]
    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }

    /// Wrap every non-empty body in a `<div>`.
    #[must_use]
    pub fn into_html(self) -> String {
        let mut out = String::new();
        for body in self.bodies.iter().filter(|b| !b.is_empty()) {
            out.push_str("<div>");
            out.push_str(body);
            out.push_str("</div>");
        }
        out
    }
}
