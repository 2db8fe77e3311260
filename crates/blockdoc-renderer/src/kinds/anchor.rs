use blockdoc_asciidoc::{Node, escape_html};

use crate::block::make_block;
use crate::context::RenderContext;
use crate::converter::Converter;
use crate::links::{normalize_url, resolve_include, strip_page_suffix};

/// Role marking a link as a reference to be inlined by the site pipeline.
const INCLUDE_ROLE: &str = "include";

impl Converter<'_> {
    /// Links and include references.
    ///
    /// Includes become single-cell `fragment` blocks around a plain anchor;
    /// other links render as anchors with their text, or the URL when empty.
    pub(crate) fn inline_anchor(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let target = strip_page_suffix(node.target.as_deref().unwrap_or_default());
        let url = normalize_url(target);

        if node.has_role(INCLUDE_ROLE) {
            let include = resolve_include(&url, self.topic_path, self.book);
            let href = escape_html(&include.url);
            let anchor = format!(r#"<a href="{href}">{href}</a>"#);
            return make_block("fragment", &anchor, &include.variants, true);
        }

        let text = self.render_inlines(&node.inlines, ctx);
        let href = escape_html(&url);
        if text.is_empty() {
            format!(r#"<a href="{href}">{href}</a>"#)
        } else {
            format!(r#"<a href="{href}">{text}</a>"#)
        }
    }
}
