//! Line-oriented AsciiDoc block parser.
//!
//! The parser walks source lines once, collecting block metadata
//! (attribute lists, titles, anchors) and dispatching on the first line of
//! each block. Delimited blocks and AsciiDoc table cells are parsed
//! recursively with a child parser that shares the document attributes.

mod attrs;
mod inline;
mod lists;
mod table;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use self::attrs::{BlockMeta, anchor_line, attr_list_line, attribute_entry, title_line};
use self::inline::{parse_inline, substitute_attributes};
use self::lists::list_line;
use crate::error::ParseError;
use crate::html::BasicHtml;
use crate::node::{Attributes, Document, Node, NodeKind};
use crate::MarkupParser;

/// Admonition labels recognized in paragraphs (`NOTE: text`) and block styles.
const ADMONITION_STYLES: &[&str] = &["NOTE", "TIP", "IMPORTANT", "WARNING", "CAUTION"];

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(={1,6})\s+(\S.*)$").unwrap());

/// `image::target[attrs]`, `include::target[attrs]`, `toc::[]`.
static BLOCK_MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(image|include|toc)::([^\[\s]*)\[(.*)\]\s*$").unwrap());

/// AsciiDoc subset parser.
///
/// Stateless: one instance may parse any number of documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiDocParser;

impl AsciiDocParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for AsciiDocParser {
    fn parse(&self, source: &str, attributes: &Attributes) -> Result<Document, ParseError> {
        let lines: Vec<&str> = source.lines().collect();
        let mut doc_attrs = DocAttributes::with_overrides(attributes);
        let mut parser = BlockParser::new(lines, 1, &mut doc_attrs);

        let title = parser.parse_header();
        let blocks = parser.parse_blocks(Some(0))?;

        let mut root = Node::new(NodeKind::Document).with_blocks(blocks);
        root.title = title;
        Ok(Document {
            root,
            attributes: doc_attrs.values,
        })
    }

    fn render_basic(&self, node: &Node, document: &Document) -> String {
        BasicHtml::new(document).render(node)
    }
}

/// Document attributes with caller overrides locked against redefinition.
struct DocAttributes {
    values: Attributes,
    locked: BTreeSet<String>,
}

impl DocAttributes {
    fn with_overrides(overrides: &Attributes) -> Self {
        Self {
            values: overrides.clone(),
            locked: overrides.keys().cloned().collect(),
        }
    }

    fn apply_entry(&mut self, name: &str, value: Option<&str>) {
        if self.locked.contains(name) {
            return;
        }
        match value {
            Some(value) => {
                let value = substitute_attributes(value, &self.values);
                self.values.insert(name.to_owned(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
    }
}

/// Whether a line is a delimiter of a delimited block, returning its context.
fn delimiter(line: &str) -> Option<&'static str> {
    let line = line.trim_end();
    if line == "--" {
        return Some("open");
    }
    if line == "|===" {
        return Some("table");
    }
    let first = line.chars().next()?;
    if line.len() < 4 || !line.chars().all(|c| c == first) {
        return None;
    }
    match first {
        '-' => Some("listing"),
        '.' => Some("literal"),
        '=' => Some("example"),
        '*' => Some("sidebar"),
        '_' => Some("quote"),
        '+' => Some("pass"),
        '/' => Some("comment"),
        _ => None,
    }
}

/// Section heading: returns (level, title); `==` is level 1.
fn heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = u8::try_from(caps.get(1)?.as_str().len() - 1).ok()?;
    Some((level, caps.get(2)?.as_str().trim_end()))
}

/// Generate a section id the way AsciiDoc does: `_` + lowercase words joined by `_`.
fn section_id(title: &str) -> String {
    let mut id = String::from("_");
    let mut pending_sep = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_sep && id.len() > 1 {
                id.push('_');
            }
            pending_sep = false;
            id.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    id
}

fn is_thematic_break(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3 && line.chars().all(|c| c == '\'')
}

/// Block parser over a slice of lines.
pub(crate) struct BlockParser<'a, 'b> {
    lines: Vec<&'a str>,
    pos: usize,
    /// 1-indexed source line of `lines[0]`.
    first_line: usize,
    /// Nesting depth of lists being parsed (paragraphs stop at list items inside lists).
    list_depth: usize,
    attrs: &'b mut DocAttributes,
}

impl<'a, 'b> BlockParser<'a, 'b> {
    fn new(lines: Vec<&'a str>, first_line: usize, attrs: &'b mut DocAttributes) -> Self {
        Self {
            lines,
            pos: 0,
            first_line,
            list_depth: 0,
            attrs,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn line_no(&self) -> usize {
        self.first_line + self.pos
    }

    fn skip_blank(&mut self) {
        while self.peek().is_some_and(|l| l.trim().is_empty()) {
            self.pos += 1;
        }
    }

    fn inline(&self, text: &str) -> Vec<Node> {
        parse_inline(text, &self.attrs.values)
    }

    /// Parse the document header: `= Title` followed by attribute entries.
    fn parse_header(&mut self) -> Option<String> {
        while self
            .peek()
            .is_some_and(|l| l.trim().is_empty() || (l.starts_with("//") && delimiter(l).is_none()))
        {
            self.pos += 1;
        }

        let title = match self.peek().and_then(heading) {
            Some((0, title)) => {
                self.pos += 1;
                Some(substitute_attributes(title, &self.attrs.values))
            }
            _ => None,
        };

        while let Some(line) = self.peek() {
            if let Some((name, value)) = attribute_entry(line) {
                self.attrs.apply_entry(name, value);
            } else if !line.starts_with("//") || delimiter(line).is_some() {
                break;
            }
            self.pos += 1;
        }
        title
    }

    /// Collect metadata lines; attribute entries and comments are consumed on the way.
    fn read_meta(&mut self) -> BlockMeta {
        let mut meta = BlockMeta::default();
        while let Some(line) = self.peek() {
            if let Some(id) = anchor_line(line) {
                meta.id = Some(id.to_owned());
            } else if let Some(content) = attr_list_line(line) {
                meta.merge_attr_list(content);
            } else if let Some(title) = title_line(line) {
                meta.title = Some(substitute_attributes(title, &self.attrs.values));
            } else if let Some((name, value)) = attribute_entry(line) {
                self.attrs.apply_entry(name, value);
            } else if line.starts_with("//") && delimiter(line).is_none() {
                // Line comment.
            } else if line.trim().is_empty() {
                // Blank lines may separate metadata from its block.
            } else {
                break;
            }
            self.pos += 1;
        }
        meta
    }

    /// Parse blocks until the input ends or a heading at or above `section_level`.
    ///
    /// `None` means headings are not sections here (delimited blocks, cells).
    fn parse_blocks(&mut self, section_level: Option<u8>) -> Result<Vec<Node>, ParseError> {
        let mut blocks = Vec::new();
        loop {
            self.skip_blank();
            let start = self.pos;
            let meta = self.read_meta();
            let Some(line) = self.peek() else {
                break;
            };

            if let Some((level, title)) = heading(line) {
                let discrete = matches!(meta.style(), Some("discrete" | "float"));
                match section_level {
                    Some(current) if !discrete && level > 0 => {
                        if level <= current {
                            self.pos = start;
                            break;
                        }
                        self.pos += 1;
                        let children = self.parse_blocks(Some(level))?;
                        blocks.push(self.section(&meta, level, title, children));
                    }
                    _ => {
                        self.pos += 1;
                        blocks.push(
                            Node::new(NodeKind::FloatingTitle)
                                .with_level(level)
                                .with_title(substitute_attributes(title, &self.attrs.values))
                                .with_id(meta.id.clone().unwrap_or_else(|| section_id(title))),
                        );
                    }
                }
                continue;
            }

            if let Some(node) = self.parse_block(meta)? {
                blocks.push(node);
            }
        }
        Ok(blocks)
    }

    fn section(&self, meta: &BlockMeta, level: u8, title: &str, children: Vec<Node>) -> Node {
        let title = substitute_attributes(title, &self.attrs.values);
        let id = meta.id.clone().unwrap_or_else(|| section_id(&title));
        let mut section = Node::new(NodeKind::Section)
            .with_level(level)
            .with_id(id)
            .with_title(title)
            .with_blocks(children);
        section.attributes = meta.node_attributes();
        section
    }

    /// Parse one block at the cursor. Returns `None` for blocks that produce no node.
    fn parse_block(&mut self, meta: BlockMeta) -> Result<Option<Node>, ParseError> {
        let Some(line) = self.peek() else {
            return Ok(None);
        };

        let node = if is_thematic_break(line) {
            self.pos += 1;
            Some(Node::new(NodeKind::ThematicBreak))
        } else if line.trim_end() == "<<<" {
            self.pos += 1;
            Some(Node::new(NodeKind::Other("page_break".to_owned())))
        } else if let Some(caps) = BLOCK_MACRO_RE.captures(line) {
            self.pos += 1;
            Some(self.block_macro(&caps[1], &caps[2], &caps[3]))
        } else if let Some(context) = delimiter(line) {
            self.parse_delimited(context, &meta)?
        } else if let Some(list) = list_line(line) {
            Some(self.parse_list(list.marker, &[])?)
        } else if line.starts_with(char::is_whitespace) {
            Some(self.parse_indented_literal(&meta))
        } else {
            Some(self.parse_paragraph(&meta))
        };

        Ok(node.map(|node| apply_meta(node, &meta)))
    }

    fn block_macro(&self, name: &str, target: &str, attr_list: &str) -> Node {
        let mut args = BlockMeta::default();
        args.merge_attr_list(attr_list);
        let target = substitute_attributes(target, &self.attrs.values);

        match name {
            "image" => {
                let mut image = Node::new(NodeKind::Image);
                if !target.is_empty() {
                    image.target = Some(target.clone());
                }
                let alt = args.style().map_or_else(|| default_alt(&target), str::to_owned);
                image.attributes.insert("alt".to_owned(), alt);
                if let Some(width) = args.positional(1).or_else(|| args.named.get("width").map(String::as_str)) {
                    image.attributes.insert("width".to_owned(), width.to_owned());
                }
                if let Some(height) = args.positional(2).or_else(|| args.named.get("height").map(String::as_str)) {
                    image.attributes.insert("height".to_owned(), height.to_owned());
                }
                image
            }
            "include" => {
                // Includes stay references; the renderer turns them into fragments.
                let mut anchor = Node::new(NodeKind::InlineAnchor).with_target(target);
                anchor.attributes = args.node_attributes();
                let role = match anchor.attributes.get("role") {
                    Some(extra) => format!("include {extra}"),
                    None => "include".to_owned(),
                };
                anchor.attributes.insert("role".to_owned(), role);
                anchor
            }
            _ => Node::new(NodeKind::Outline),
        }
    }

    /// Collect lines up to the closing delimiter matching `open`.
    fn collect_delimited(&mut self, context: &'static str) -> Result<(Vec<&'a str>, usize), ParseError> {
        let open_line = self.line_no();
        let open = self.peek().unwrap_or_default().trim_end();
        self.pos += 1;
        let content_line = self.line_no();
        let start = self.pos;
        while let Some(line) = self.peek() {
            if line.trim_end() == open {
                let content = self.lines[start..self.pos].to_vec();
                self.pos += 1;
                return Ok((content, content_line));
            }
            self.pos += 1;
        }
        Err(ParseError::UnterminatedBlock {
            context,
            line: open_line,
        })
    }

    fn parse_children(&mut self, lines: Vec<&str>, first_line: usize) -> Result<Vec<Node>, ParseError> {
        BlockParser::new(lines, first_line, &mut *self.attrs).parse_blocks(None)
    }

    fn parse_delimited(
        &mut self,
        context: &'static str,
        meta: &BlockMeta,
    ) -> Result<Option<Node>, ParseError> {
        if context == "table" {
            return self.parse_table(meta).map(Some);
        }

        let (content, first_line) = self.collect_delimited(context)?;
        let style = meta.style();
        let admonition = style.filter(|s| ADMONITION_STYLES.contains(s));

        let node = match context {
            "comment" => return Ok(None),
            "listing" | "literal" => {
                let kind = match (context, style) {
                    (_, Some("literal")) | ("literal", _) => NodeKind::Literal,
                    _ => NodeKind::Listing,
                };
                let mut node = Node::new(kind).with_text(content.join("\n"));
                if let Some(language) = self.source_language(meta) {
                    node.attributes.insert("language".to_owned(), language);
                }
                node
            }
            "pass" => Node::new(NodeKind::Other("pass".to_owned())).with_text(content.join("\n")),
            _ if admonition.is_some() => {
                let style = admonition.unwrap_or("NOTE");
                Node::new(NodeKind::Admonition)
                    .with_style(style)
                    .with_blocks(self.parse_children(content, first_line)?)
            }
            "quote" => {
                let mut node = Node::new(NodeKind::Other("quote".to_owned()))
                    .with_blocks(self.parse_children(content, first_line)?);
                if let Some(attribution) = meta.positional(1) {
                    node.attributes
                        .insert("attribution".to_owned(), attribution.to_owned());
                }
                node
            }
            other => Node::new(NodeKind::Other(other.to_owned()))
                .with_blocks(self.parse_children(content, first_line)?),
        };
        Ok(Some(node))
    }

    fn source_language(&self, meta: &BlockMeta) -> Option<String> {
        match meta.style() {
            Some("source") => meta
                .positional(1)
                .map(str::to_owned)
                .or_else(|| self.attrs.values.get("source-language").cloned()),
            _ => meta.named.get("language").cloned(),
        }
    }

    /// Literal paragraph: consecutive indented lines, common indent removed.
    fn parse_indented_literal(&mut self, meta: &BlockMeta) -> Node {
        let start = self.pos;
        while self.peek().is_some_and(|l| !l.trim().is_empty()) {
            self.pos += 1;
        }
        let lines = &self.lines[start..self.pos];
        let indent = lines
            .iter()
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        let text = lines
            .iter()
            .map(|l| l.get(indent..).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");
        let kind = match meta.style() {
            Some("source" | "listing") => NodeKind::Listing,
            _ => NodeKind::Literal,
        };
        Node::new(kind).with_text(text)
    }

    /// Whether a line ends the paragraph that precedes it.
    fn ends_paragraph(&self, line: &str) -> bool {
        line.trim().is_empty()
            || delimiter(line).is_some()
            || attr_list_line(line).is_some()
            || anchor_line(line).is_some()
            || (self.list_depth > 0 && (line.trim() == "+" || list_line(line).is_some()))
    }

    fn parse_paragraph(&mut self, meta: &BlockMeta) -> Node {
        let start = self.pos;
        self.pos += 1;
        while self.peek().is_some_and(|l| !self.ends_paragraph(l)) {
            self.pos += 1;
        }
        let text = self.lines[start..self.pos]
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n");

        match meta.style() {
            Some("source" | "listing") => {
                let mut node = Node::new(NodeKind::Listing).with_text(text);
                if let Some(language) = self.source_language(meta) {
                    node.attributes.insert("language".to_owned(), language);
                }
                return node;
            }
            Some("literal") => return Node::new(NodeKind::Literal).with_text(text),
            Some("pass") => return Node::new(NodeKind::Other("pass".to_owned())).with_text(text),
            Some(style) if ADMONITION_STYLES.contains(&style) => {
                return self.admonition_paragraph(style, &text);
            }
            _ => {}
        }

        if let Some((label, rest)) = text.split_once(": ")
            && ADMONITION_STYLES.contains(&label)
        {
            return self.admonition_paragraph(label, rest);
        }

        Node::new(NodeKind::Paragraph).with_inlines(self.inline(&text))
    }

    fn admonition_paragraph(&self, style: &str, text: &str) -> Node {
        let paragraph = Node::new(NodeKind::Paragraph).with_inlines(self.inline(text.trim()));
        Node::new(NodeKind::Admonition)
            .with_style(style)
            .with_blocks(vec![paragraph])
    }
}

/// Apply collected metadata (id, title, roles, named attributes) to a block.
fn apply_meta(mut node: Node, meta: &BlockMeta) -> Node {
    if node.id.is_none() {
        node.id.clone_from(&meta.id);
    }
    if node.title.is_none() {
        node.title.clone_from(&meta.title);
    }
    for (key, value) in meta.node_attributes() {
        if key == "role"
            && let Some(existing) = node.attributes.get("role")
        {
            let merged = format!("{existing} {value}");
            node.attributes.insert(key, merged);
            continue;
        }
        node.attributes.entry(key).or_insert(value);
    }
    node
}

/// Default image alt text: the file stem with separators turned into spaces.
fn default_alt(target: &str) -> String {
    let file = target.rsplit('/').next().unwrap_or(target);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    stem.replace(['-', '_'], " ")
}
