//! Node dispatcher.

use blockdoc_asciidoc::{MarkupParser, Node, NodeKind};

use crate::book::Book;
use crate::context::RenderContext;

/// Block-convention converter.
///
/// Holds only shared references, so one converter may render any number of
/// documents, concurrently or reentrantly. Per-call state lives in
/// [`RenderContext`].
pub struct Converter<'a> {
    pub(crate) parser: &'a dyn MarkupParser,
    pub(crate) book: &'a dyn Book,
    pub(crate) topic_path: &'a str,
}

impl<'a> Converter<'a> {
    /// Create a converter for the topic at `topic_path`.
    ///
    /// `parser` renders kinds without a block-convention rule; `book`
    /// resolves include and image paths.
    #[must_use]
    pub fn new(parser: &'a dyn MarkupParser, book: &'a dyn Book, topic_path: &'a str) -> Self {
        Self {
            parser,
            book,
            topic_path,
        }
    }

    /// Render a node, dispatching on `kind_override` or the node's own kind.
    ///
    /// Kinds without a block-convention rule are rendered by the parser's
    /// basic renderer.
    #[must_use]
    pub fn render(&self, node: &Node, ctx: &RenderContext<'_>, kind_override: Option<&NodeKind>) -> String {
        let kind = kind_override.unwrap_or(&node.kind);
        match kind {
            NodeKind::Document => self.document(node, ctx),
            NodeKind::Section => self.section(node, ctx).into_html(),
            NodeKind::Paragraph => self.paragraph(node, ctx),
            NodeKind::OrderedList => self.ordered_list(node, ctx),
            NodeKind::UnorderedList => self.unordered_list(node, ctx),
            NodeKind::DescriptionList => self.description_list(node, ctx),
            NodeKind::ListItem => self.list_item(node, ctx),
            NodeKind::Table => self.table(node, ctx),
            NodeKind::Image => self.image(node),
            NodeKind::Admonition => self.admonition(node, ctx),
            NodeKind::Literal | NodeKind::Listing => Self::preformatted(node),
            NodeKind::ThematicBreak => "<hr>".to_owned(),
            NodeKind::InlineQuoted => self.inline_quoted(node, ctx),
            NodeKind::InlineAnchor => self.inline_anchor(node, ctx),
            NodeKind::FloatingTitle => {
                tracing::error!(title = ?node.title, "Floating titles are not supported");
                String::new()
            }
            NodeKind::Embedded => self.render_blocks(&node.blocks, ctx),
            NodeKind::Text => Self::text(node),
            NodeKind::Outline => {
                tracing::error!("Document outlines are not supported");
                String::new()
            }
            NodeKind::Other(name) => {
                tracing::debug!(kind = %name, "No block renderer, using basic HTML");
                self.parser.render_basic(node, ctx.document())
            }
        }
    }

    /// Render child blocks in order.
    pub(crate) fn render_blocks(&self, blocks: &[Node], ctx: &RenderContext<'_>) -> String {
        blocks.iter().map(|block| self.render(block, ctx, None)).collect()
    }

    /// Render inline children in order.
    pub(crate) fn render_inlines(&self, inlines: &[Node], ctx: &RenderContext<'_>) -> String {
        inlines.iter().map(|inline| self.render(inline, ctx, None)).collect()
    }
}
