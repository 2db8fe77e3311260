use std::fmt::Write;

use blockdoc_asciidoc::{Node, escape_html};

use crate::block::{make_block, normalize_identifier};
use crate::context::RenderContext;
use crate::converter::Converter;
use crate::links::resolve_image;

impl Converter<'_> {
    /// Single-cell `admonition {style}` block with optional icon and title.
    pub(crate) fn admonition(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let style = node.style.as_deref().unwrap_or("note").to_lowercase();
        let mut content = String::new();
        if ctx.icons_enabled() {
            write!(
                content,
                r#"<span class="icon icon-{}"></span>"#,
                normalize_identifier(&style)
            )
            .unwrap();
        }
        if let Some(title) = node.title.as_deref().filter(|t| !t.trim().is_empty()) {
            write!(content, "<h6>{}</h6>", escape_html(title)).unwrap();
        }
        content.push_str(&self.render_blocks(&node.blocks, ctx));
        make_block("admonition", &content, &[style], true)
    }

    /// Literal and listing blocks.
    pub(crate) fn preformatted(node: &Node) -> String {
        let text = node.text.as_deref().unwrap_or_default().replace('\t', " ");
        match node.attr("language").filter(|l| !l.is_empty()) {
            Some(language) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(language),
                escape_html(&text)
            ),
            None => format!("<pre><code>{}</code></pre>", escape_html(&text)),
        }
    }

    /// Image from the topic's images directory; dropped without a target.
    pub(crate) fn image(&self, node: &Node) -> String {
        let Some(target) = node.target.as_deref().filter(|t| !t.is_empty()) else {
            tracing::debug!("Dropping image without target");
            return String::new();
        };

        let src = resolve_image(target, self.topic_path, self.book);
        let mut out = String::new();
        write!(
            out,
            r#"<img src="{}" alt="{}""#,
            escape_html(&src),
            escape_html(node.attr("alt").unwrap_or_default())
        )
        .unwrap();
        if let Some(width) = node.attr("width") {
            write!(out, r#" width="{}""#, escape_html(width)).unwrap();
        }
        out.push('>');
        out
    }
}
