//! Node tree produced by the parser.
//!
//! Every node exposes the same surface regardless of its kind: a [`NodeKind`]
//! tag, an attribute map, ordered child blocks and inline children, plus a
//! handful of kind-specific accessors (text, target, style, level, table,
//! description-list entries). Renderers read only what their kind needs.

use std::collections::BTreeMap;
use std::fmt;

/// Flat string-to-string attribute mapping.
pub type Attributes = BTreeMap<String, String>;

/// What a node represents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Section,
    Paragraph,
    OrderedList,
    UnorderedList,
    DescriptionList,
    ListItem,
    Table,
    Image,
    Admonition,
    Literal,
    Listing,
    ThematicBreak,
    InlineQuoted,
    InlineAnchor,
    FloatingTitle,
    Embedded,
    /// Plain run of inline text.
    Text,
    /// Table of contents placeholder (`toc::[]`).
    Outline,
    /// Any other block context (`example`, `sidebar`, `quote`, `pass`, ...).
    Other(String),
}

impl NodeKind {
    /// Stable name of the kind, as used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::Section => "section",
            Self::Paragraph => "paragraph",
            Self::OrderedList => "olist",
            Self::UnorderedList => "ulist",
            Self::DescriptionList => "dlist",
            Self::ListItem => "list_item",
            Self::Table => "table",
            Self::Image => "image",
            Self::Admonition => "admonition",
            Self::Literal => "literal",
            Self::Listing => "listing",
            Self::ThematicBreak => "thematic_break",
            Self::InlineQuoted => "inline_quoted",
            Self::InlineAnchor => "inline_anchor",
            Self::FloatingTitle => "floating_title",
            Self::Embedded => "embedded",
            Self::Text => "text",
            Self::Outline => "outline",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the parsed document tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Explicit or generated element id.
    pub id: Option<String>,
    /// Block title (`.Title` line, section heading, document title).
    pub title: Option<String>,
    /// Block attributes (`role`, `alt`, `width`, `language`, ...).
    pub attributes: Attributes,
    /// Child blocks.
    pub blocks: Vec<Node>,
    /// Inline children (text runs, quoted spans, anchors).
    pub inlines: Vec<Node>,
    /// Raw text (text runs, literal and listing source, passthrough content).
    pub text: Option<String>,
    /// Link or image target.
    pub target: Option<String>,
    /// Admonition style (`NOTE`, `TIP`, ...) or quoted span type (`strong`, ...).
    pub style: Option<String>,
    /// Section or heading level (`==` is level 1).
    pub level: u8,
    /// Table rows, for [`NodeKind::Table`].
    pub table: Option<Table>,
    /// Description list entries, for [`NodeKind::DescriptionList`].
    pub entries: Vec<DescriptionEntry>,
}

impl Node {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            title: None,
            attributes: Attributes::new(),
            blocks: Vec::new(),
            inlines: Vec::new(),
            text: None,
            target: None,
            style: None,
            level: 0,
            table: None,
            entries: Vec::new(),
        }
    }

    /// Create a plain text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_text(text)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<Node>) -> Self {
        self.blocks = blocks;
        self
    }

    #[must_use]
    pub fn with_inlines(mut self, inlines: Vec<Node>) -> Self {
        self.inlines = inlines;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub fn with_entries(mut self, entries: Vec<DescriptionEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Look up an attribute.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The `role` attribute, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    /// Whether the space-separated `role` attribute contains `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role()
            .is_some_and(|roles| roles.split_whitespace().any(|r| r == role))
    }

    /// Concatenated text of this node's inline subtree, without markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    if node.kind == NodeKind::Text
        && let Some(text) = &node.text
    {
        out.push_str(text);
    }
    for inline in &node.inlines {
        collect_text(inline, out);
    }
}

/// Table rows split into head, body and foot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub head: Vec<Row>,
    pub body: Vec<Row>,
    pub foot: Vec<Row>,
}

/// A table row.
pub type Row = Vec<Cell>;

/// A table cell.
///
/// Regular cells carry inline content; AsciiDoc (`a|`) cells carry blocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub inlines: Vec<Node>,
    pub blocks: Vec<Node>,
}

impl Cell {
    #[must_use]
    pub fn inline(inlines: Vec<Node>) -> Self {
        Self {
            inlines,
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn blocks(blocks: Vec<Node>) -> Self {
        Self {
            inlines: Vec::new(),
            blocks,
        }
    }
}

/// One entry of a description list: one or more terms and an optional description.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptionEntry {
    /// Term items (list items carrying inline content).
    pub terms: Vec<Node>,
    /// Description item (inline content plus nested blocks).
    pub description: Option<Node>,
}

/// A parsed document: the root node plus document-level attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Root node, of kind [`NodeKind::Document`].
    pub root: Node,
    /// Header attributes merged with caller overrides.
    pub attributes: Attributes,
}

impl Document {
    /// Document title (`= Title`), if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.root.title.as_deref()
    }

    /// Look up a document attribute.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Whether a document attribute is set (with any value).
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }
}
