use std::fmt::Write;

use blockdoc_asciidoc::{Node, NodeKind, escape_html};

use crate::context::{Containers, RenderContext};
use crate::converter::Converter;

impl Converter<'_> {
    /// Document root: title and preamble stay bare; the first section opens
    /// the containers that every later block continues.
    pub(crate) fn document(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let mut out = String::new();
        if let Some(title) = node.title.as_deref().filter(|t| !t.is_empty())
            && !ctx.document().has_attr("notitle")
        {
            write!(out, "<h1>{}</h1>", escape_html(title)).unwrap();
        }

        let mut containers: Option<Containers> = None;
        for block in &node.blocks {
            if block.kind == NodeKind::Section {
                containers
                    .get_or_insert_with(Containers::new)
                    .merge(self.section(block, ctx));
            } else if let Some(open) = containers.as_mut() {
                open.push_str(&self.render(block, ctx, None));
            } else {
                out.push_str(&self.render(block, ctx, None));
            }
        }
        if let Some(containers) = containers {
            out.push_str(&containers.into_html());
        }
        out
    }

    /// A nested section starts a new sibling container; a top-level one continues the open one.
    pub(crate) fn section(&self, node: &Node, ctx: &RenderContext<'_>) -> Containers {
        let mut containers = Containers::new();
        if ctx.depth() > 0 {
            containers.open_new();
        }

        if let Some(title) = node.title.as_deref() {
            let rank = node.level.saturating_add(1).clamp(1, 6);
            let mut heading = String::new();
            match node.id.as_deref() {
                Some(id) => write!(heading, r#"<h{rank} id="{}">"#, escape_html(id)).unwrap(),
                None => write!(heading, "<h{rank}>").unwrap(),
            }
            write!(heading, "{}</h{rank}>", escape_html(title)).unwrap();
            containers.push_str(&heading);
        }

        self.push_children(&mut containers, &node.blocks, &ctx.nested());
        containers
    }

    fn push_children(&self, containers: &mut Containers, blocks: &[Node], ctx: &RenderContext<'_>) {
        for block in blocks {
            if block.kind == NodeKind::Section {
                containers.merge(self.section(block, ctx));
            } else {
                containers.push_str(&self.render(block, ctx, None));
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
        let converter = Converter::new(&PARSER, &TestBook, "guide/intro.adoc");
        converter.render(&doc.root, &RenderContext::new(&doc), None)
    }

    #[test]
    fn test_flat_sections_share_one_container() {
        let html = render("== One\n\nfirst\n\nsecond\n\n== Two\n\nthird");
        assert_eq!(html.matches("<div>").count(), 1);
        assert_eq!(
            html,
            r#"<div><h2 id="_one">One</h2><p>first</p><p>second</p><h2 id="_two">Two</h2><p>third</p></div>"#
        );
    }

    #[test]
    fn test_nested_section_opens_sibling_container() {
        let html = render("== A\n\npa\n\n=== B\n\npb\n\n== C\n\npc");
        assert_eq!(
            html,
            concat!(
                r#"<div><h2 id="_a">A</h2><p>pa</p></div>"#,
                r#"<div><h3 id="_b">B</h3><p>pb</p><h2 id="_c">C</h2><p>pc</p></div>"#,
            )
        );
    }

    #[test]
    fn test_depth_restored_after_section() {
        let doc = PARSER
            .parse("== A\n\n=== B\n\n==== C\n\ntext", &Attributes::new())
            .unwrap();
        let converter = Converter::new(&PARSER, &TestBook, "intro.adoc");
        let ctx = RenderContext::new(&doc);
        let containers = converter.section(&doc.root.blocks[0], &ctx);
        assert_eq!(ctx.depth(), 0);
        assert_eq!(containers.bodies().len(), 3);
    }

    #[test]
    fn test_document_title_and_notitle() {
        assert_eq!(render("= Guide\n\nBody."), "<h1>Guide</h1><p>Body.</p>");
        assert_eq!(render("= Guide\n:notitle:\n\nBody."), "<p>Body.</p>");
    }

    #[test]
    fn test_preamble_stays_outside_containers() {
        assert_eq!(
            render("= Guide\n\nIntro.\n\n* one\n\n== A\n\ntext"),
            concat!(
                "<h1>Guide</h1><p>Intro.</p><ul><li><p>one</p></li></ul>",
                r#"<div><h2 id="_a">A</h2><p>text</p></div>"#,
            )
        );
    }

    #[test]
    fn test_heading_rank_is_capped() {
        let node = Node::new(NodeKind::Section).with_level(7).with_title("Deep");
        let doc = crate::kinds::test_support::document(Vec::new());
        let converter = Converter::new(&PARSER, &TestBook, "intro.adoc");
        let html = converter.section(&node, &RenderContext::new(&doc)).into_html();
        assert_eq!(html, "<div><h6>Deep</h6></div>");
    }

    #[test]
    fn test_empty_document_renders_nothing() {
        assert_eq!(render(""), "");
    }
}
