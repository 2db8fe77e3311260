use blockdoc_asciidoc::{Node, escape_html};

use crate::context::RenderContext;
use crate::converter::Converter;

impl Converter<'_> {
    pub(crate) fn paragraph(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        format!("<p>{}</p>", self.render_inlines(&node.inlines, ctx))
    }

    pub(crate) fn text(node: &Node) -> String {
        escape_html(node.text.as_deref().unwrap_or_default())
    }

    /// Quoted span; unknown span types keep their content without a wrapper.
    pub(crate) fn inline_quoted(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let content = self.render_inlines(&node.inlines, ctx);
        let tag = match node.style.as_deref() {
            Some("strong") => "strong",
            Some("monospaced") => "code",
            Some("emphasis") => "em",
            other => {
                tracing::warn!(style = ?other, "Unknown quoted span type, rendering text only");
                return content;
            }
        };
        format!("<{tag}>{content}</{tag}>")
    }
}
