//! Table flattening into row and column `<div>`s.

use std::fmt::Write;

use crate::block::{make_block, normalize_identifier, parse_block_name};

/// Flatten rendered rows into `<div>` rows holding one `<div>` per cell.
///
/// Rows shorter than the widest row are padded with empty cells.
#[must_use]
pub fn flatten_rows(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        out.push_str("<div>");
        for cell in row {
            write!(out, "<div>{cell}</div>").unwrap();
        }
        for _ in row.len()..width {
            out.push_str("<div></div>");
        }
        out.push_str("</div>");
    }
    out
}

/// Render a headless titled table as a block named by its title.
///
/// The title follows the `Name (variant, variant)` convention. Returns
/// `None` when the name is empty after normalization or the body has no rows.
#[must_use]
pub fn titled_block(title: &str, body: &[Vec<String>]) -> Option<String> {
    let block = parse_block_name(title);
    if normalize_identifier(&block.name).is_empty() || body.is_empty() {
        return None;
    }
    Some(make_block(&block.name, &flatten_rows(body), &block.variants, false))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| (*c).to_owned()).collect())
            .collect()
    }

    #[test]
    fn test_flatten_rows() {
        assert_eq!(
            flatten_rows(&rows(&[&["a", "b"], &["c", "d"]])),
            "<div><div>a</div><div>b</div></div><div><div>c</div><div>d</div></div>"
        );
    }

    #[test]
    fn test_flatten_pads_ragged_rows() {
        assert_eq!(
            flatten_rows(&rows(&[&["a", "b", "c"], &["d"]])),
            "<div><div>a</div><div>b</div><div>c</div></div><div><div>d</div><div></div><div></div></div>"
        );
    }

    #[test]
    fn test_flatten_empty() {
        assert_eq!(flatten_rows(&[]), "");
    }

    #[test]
    fn test_titled_block() {
        assert_eq!(
            titled_block("Columns (Wide)", &rows(&[&["a", "b"]])).as_deref(),
            Some(r#"<div class="columns wide"><div><div>a</div><div>b</div></div></div>"#)
        );
    }

    #[test]
    fn test_titled_block_not_applicable() {
        assert_eq!(titled_block("(only variants)", &rows(&[&["a"]])), None);
        assert_eq!(titled_block("Cards", &[]), None);
    }
}
