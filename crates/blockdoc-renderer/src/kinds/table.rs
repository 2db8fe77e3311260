use blockdoc_asciidoc::{Cell, Node, Row, Table};

use crate::block::make_block;
use crate::context::RenderContext;
use crate::converter::Converter;
use crate::table::{flatten_rows, titled_block};

impl Converter<'_> {
    /// Tables: titled headless tables become named blocks, the rest `table` blocks.
    pub(crate) fn table(&self, node: &Node, ctx: &RenderContext<'_>) -> String {
        let empty = Table::default();
        let table = node.table.as_ref().unwrap_or(&empty);
        let headless = table.head.is_empty();
        let body = self.render_rows(&table.body, ctx);

        if headless
            && let Some(title) = node.title.as_deref().filter(|t| !t.trim().is_empty())
            && let Some(block) = titled_block(title, &body)
        {
            return block;
        }

        let mut content = flatten_rows(&self.render_rows(&table.head, ctx));
        content.push_str(&flatten_rows(&body));
        content.push_str(&flatten_rows(&self.render_rows(&table.foot, ctx)));

        let variants: &[&str] = if headless { &["headless"] } else { &[] };
        make_block("table", &content, variants, false)
    }

    fn render_rows(&self, rows: &[Row], ctx: &RenderContext<'_>) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| self.table_cell(cell, ctx)).collect())
            .collect()
    }

    fn table_cell(&self, cell: &Cell, ctx: &RenderContext<'_>) -> String {
        if !cell.blocks.is_empty() {
            return self.render_blocks(&cell.blocks, ctx);
        }
        let text = self.render_inlines(&cell.inlines, ctx);
        if text.is_empty() {
            String::new()
        } else {
            format!("<p>{text}</p>")
        }
    }
}
