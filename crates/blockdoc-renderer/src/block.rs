//! Convention blocks: class-named `<div>` containers with variant classes.

use std::fmt::Write;

/// Turn arbitrary text into a class-safe identifier.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9]` with a
/// single `-` and trims `-` from both ends.
///
/// ```
/// use blockdoc_renderer::normalize_identifier;
///
/// assert_eq!(normalize_identifier("Key Figures (2024)"), "key-figures-2024");
/// assert_eq!(normalize_identifier("--"), "");
/// ```
#[must_use]
pub fn normalize_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Build a convention block.
///
/// `name` and every variant are normalized; variants that normalize to
/// nothing are dropped. With `single_cell` the content is wrapped in one row
/// holding one column.
#[must_use]
pub fn make_block<S: AsRef<str>>(name: &str, content: &str, variants: &[S], single_cell: bool) -> String {
    let mut class = normalize_identifier(name);
    for variant in variants {
        let variant = normalize_identifier(variant.as_ref());
        if !variant.is_empty() {
            class.push(' ');
            class.push_str(&variant);
        }
    }

    let content = content.trim();
    let mut out = String::with_capacity(content.len() + class.len() + 32);
    write!(out, r#"<div class="{class}">"#).unwrap();
    if single_cell {
        write!(out, "<div><div>{content}</div></div>").unwrap();
    } else {
        out.push_str(content);
    }
    out.push_str("</div>");
    out
}

/// Block name written as `Name (variant, variant)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockName {
    pub name: String,
    pub variants: Vec<String>,
}

/// Split a block title into its name and parenthesized variants.
#[must_use]
pub fn parse_block_name(title: &str) -> BlockName {
    let title = title.trim();
    if let Some(open) = title.find('(')
        && let Some(inner) = title[open + 1..].strip_suffix(')')
    {
        return BlockName {
            name: title[..open].trim().to_owned(),
            variants: inner
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
                .collect(),
        };
    }
    BlockName {
        name: title.to_owned(),
        variants: Vec::new(),
    }
}
