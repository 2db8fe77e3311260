use std::fmt::Write;

use blockdoc_asciidoc::{Node, NodeKind};

use crate::block::make_block;
use crate::context::RenderContext;
use crate::converter::Converter;

/// Role turning an ordered list into a `procedure` block.
const PROCEDURE_ROLE: &str = "procedure";

const NO_VARIANTS: &[&str] = &[];

impl Converter<'_> {
    pub(crate) fn unordered_list(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        self.list("ul", node, ctx)
    }

    /// Ordered list, wrapped in a single-cell `procedure` block when it has that role.
    pub(crate) fn ordered_list(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let list = self.list("ol", node, ctx);
        if node.has_role(PROCEDURE_ROLE) {
            make_block(PROCEDURE_ROLE, &list, NO_VARIANTS, true)
        } else {
            list
        }
    }

    fn list(&self, tag: &str, node: &Node, ctx: &RenderContext<'_>) -> String {
        let items = self.render_blocks(&node.blocks, ctx);
        if items.is_empty() {
            return String::new();
        }
        format!("<{tag}>{items}</{tag}>")
    }

    pub(crate) fn list_item(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let text = self.render_inlines(&node.inlines, ctx);
        let nested = self.render_blocks(&node.blocks, ctx);
        if text.is_empty() && nested.is_empty() {
            return String::new();
        }

        let mut out = String::from("<li>");
        if !text.is_empty() {
            write!(out, "<p>{text}</p>").unwrap();
        }
        out.push_str(&nested);
        out.push_str("</li>");
        out
    }

    /// Description list as a `dlist` grid: one row per entry, term and definition columns.
    pub(crate) fn description_list(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let mut rows = String::new();
        for entry in &node.entries {
            let mut terms = String::new();
            self.flatten_terms(&entry.terms, ctx, &mut terms);

            let mut definition = String::new();
            if let Some(description) = &entry.description {
                let text = self.render_inlines(&description.inlines, ctx);
                if !text.is_empty() {
                    write!(definition, "<p>{text}</p>").unwrap();
                }
                definition.push_str(&self.render_blocks(&description.blocks, ctx));
            }

            write!(rows, "<div><div>{terms}</div><div>{definition}</div></div>").unwrap();
        }
        if rows.is_empty() {
            return String::new();
        }
        make_block("dlist", &rows, NO_VARIANTS, false)
    }

    /// One `<p>` per leaf term; terms nesting further terms are flattened.
    fn flatten_terms(&self, terms: &[Node], ctx: &RenderContext<'_>, out: &mut String) {
        for term in terms {
            let text = self.render_inlines(&term.inlines, ctx);
            if !text.is_empty() {
                write!(out, "<p>{text}</p>").unwrap();
            }
            if term.blocks.iter().all(|b| b.kind == NodeKind::ListItem) {
                self.flatten_terms(&term.blocks, ctx, out);
            } else {
                out.push_str(&self.render_blocks(&term.blocks, ctx));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockdoc_asciidoc::{Attributes, MarkupParser};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::kinds::test_support::{PARSER, TestBook};

    fn render(source: &str) -> String {
        let doc = PARSER.parse(source, &Attributes::new()).unwrap();
        let converter = Converter::new(&PARSER, &TestBook, "intro.adoc");
        converter.render_blocks(&doc.root.blocks, &RenderContext::new(&doc))
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(render("* a\n* b"), "<ul><li><p>a</p></li><li><p>b</p></li></ul>");
    }

    #[test]
    fn test_nested_list_follows_item_text() {
        assert_eq!(
            render("* a\n** a1\n* b"),
            "<ul><li><p>a</p><ul><li><p>a1</p></li></ul></li><li><p>b</p></li></ul>"
        );
    }

    #[test]
    fn test_procedure_list_is_wrapped() {
        assert_eq!(
            render("[.procedure]\n. Install\n. Run"),
            r#"<div class="procedure"><div><div><ol><li><p>Install</p></li><li><p>Run</p></li></ol></div></div></div>"#
        );
    }

    #[test]
    fn test_plain_ordered_list_is_not_wrapped() {
        assert_eq!(render("[.steps]\n. Install"), "<ol><li><p>Install</p></li></ol>");
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let doc = crate::kinds::test_support::document(Vec::new());
        let converter = Converter::new(&PARSER, &TestBook, "intro.adoc");
        let ctx = RenderContext::new(&doc);

        let list = Node::new(NodeKind::UnorderedList)
            .with_blocks(vec![Node::new(NodeKind::ListItem), Node::new(NodeKind::ListItem)]);
        assert_eq!(converter.render(&list, &ctx, None), "");
    }

    #[test]
    fn test_description_list_grid() {
        assert_eq!(
            render("CPU::\nProcessor::\nThe brain.\nRAM:: Memory"),
            concat!(
                r#"<div class="dlist">"#,
                "<div><div><p>CPU</p><p>Processor</p></div><div><p>The brain.</p></div></div>",
                "<div><div><p>RAM</p></div><div><p>Memory</p></div></div>",
                "</div>"
            )
        );
    }

    #[test]
    fn test_nested_terms_are_flattened() {
        let doc = crate::kinds::test_support::document(Vec::new());
        let converter = Converter::new(&PARSER, &TestBook, "intro.adoc");
        let term = |text: &str| Node::new(NodeKind::ListItem).with_inlines(vec![Node::text(text)]);
        let group = Node::new(NodeKind::ListItem).with_blocks(vec![term("b"), term("c")]);

        let mut out = String::new();
        converter.flatten_terms(&[term("a"), group], &RenderContext::new(&doc), &mut out);
        assert_eq!(out, "<p>a</p><p>b</p><p>c</p>");
    }
}
