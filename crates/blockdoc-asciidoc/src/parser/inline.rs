//! Inline parsing: quoted spans, links, cross references and attribute references.
//!
//! Produces a flat-or-nested sequence of [`Node`]s of kind [`NodeKind::Text`],
//! [`NodeKind::InlineQuoted`] and [`NodeKind::InlineAnchor`].

use std::sync::LazyLock;

use regex::Regex;

use super::attrs::split_attr_list;
use crate::node::{Attributes, Node, NodeKind};

static ATTRIBUTE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_][A-Za-z0-9_-]*)\}").unwrap());

/// `link:target[text]` and `xref:target[text]`.
static MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(link|xref):([^\s\[]+)\[([^\]]*)\]").unwrap());

/// `<<id>>` and `<<id,text>>`.
static XREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<<([^,>\s]+)(?:,\s*([^>]+))?>>").unwrap());

/// Bare or bracketed URL.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://[^\s\[<]+)(?:\[([^\]]*)\])?").unwrap());

static MONOSPACED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`([^`]+)`").unwrap());

/// Quoted span markers: (marker, span type, constrained to word boundaries).
const QUOTES: &[(char, &str, bool)] = &[
    ('*', "strong", true),
    ('_', "emphasis", true),
    ('#', "mark", true),
    ('^', "superscript", false),
    ('~', "subscript", false),
];

/// Parse inline text into nodes, substituting `{name}` attribute references.
pub(crate) fn parse_inline(text: &str, attributes: &Attributes) -> Vec<Node> {
    let substituted = substitute_attributes(text, attributes);
    InlineScanner::new(&substituted, attributes).scan()
}

/// Replace `{name}` references with attribute values; unknown references stay.
pub(crate) fn substitute_attributes(text: &str, attributes: &Attributes) -> String {
    ATTRIBUTE_REF_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            attributes.get(&caps[1]).cloned().unwrap_or_else(|| {
                tracing::debug!(attribute = &caps[1], "Reference to missing attribute");
                caps[0].to_owned()
            })
        })
        .into_owned()
}

struct InlineScanner<'a> {
    text: &'a str,
    attributes: &'a Attributes,
    nodes: Vec<Node>,
    pending: String,
}

impl<'a> InlineScanner<'a> {
    fn new(text: &'a str, attributes: &'a Attributes) -> Self {
        Self {
            text,
            attributes,
            nodes: Vec::new(),
            pending: String::new(),
        }
    }

    fn scan(mut self) -> Vec<Node> {
        let mut pos = 0;
        while pos < self.text.len() {
            let prev = self.text[..pos].chars().next_back();
            let rest = &self.text[pos..];
            if let Some((node, consumed)) = self.match_at(rest, prev) {
                self.flush();
                self.nodes.push(node);
                pos += consumed;
            } else {
                let c = rest.chars().next().unwrap_or_default();
                self.pending.push(c);
                pos += c.len_utf8();
            }
        }
        self.flush();
        self.nodes
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.nodes.push(Node::text(std::mem::take(&mut self.pending)));
        }
    }

    fn match_at(&self, rest: &str, prev: Option<char>) -> Option<(Node, usize)> {
        let at_word_start = prev.is_none_or(|c| !c.is_alphanumeric());
        let first = rest.chars().next()?;
        match first {
            'l' | 'x' if at_word_start => self.match_macro(rest),
            'h' if at_word_start => self.match_url(rest),
            '<' => self.match_xref(rest),
            '`' if at_word_start => match_monospaced(rest),
            _ => QUOTES
                .iter()
                .find(|(marker, _, _)| *marker == first)
                .and_then(|&(marker, kind, constrained)| {
                    if constrained {
                        self.match_quoted(rest, prev, marker, kind)
                    } else {
                        self.match_script(rest, marker, kind)
                    }
                }),
        }
    }

    fn match_macro(&self, rest: &str) -> Option<(Node, usize)> {
        let caps = MACRO_RE.captures(rest)?;
        let kind = &caps[1];
        let mut anchor = self.anchor(&caps[2], &caps[3]);
        anchor.attributes.insert("type".to_owned(), kind.to_owned());
        Some((anchor, caps[0].len()))
    }

    fn match_url(&self, rest: &str) -> Option<(Node, usize)> {
        let caps = URL_RE.captures(rest)?;
        let mut target = &caps[1];
        let mut consumed = caps[0].len();
        // Trailing sentence punctuation is not part of a bare URL.
        if caps.get(2).is_none() {
            let trimmed = target.trim_end_matches(['.', ',', ';', ':', ')', '!', '?']);
            consumed -= target.len() - trimmed.len();
            target = trimmed;
        }
        let mut anchor = self.anchor(target, caps.get(2).map_or("", |m| m.as_str()));
        anchor
            .attributes
            .insert("type".to_owned(), "link".to_owned());
        Some((anchor, consumed))
    }

    fn match_xref(&self, rest: &str) -> Option<(Node, usize)> {
        let caps = XREF_RE.captures(rest)?;
        let id = &caps[1];
        let target = if id.contains('#') || id.contains('.') {
            id.to_owned()
        } else {
            format!("#{id}")
        };
        let mut anchor = Node::new(NodeKind::InlineAnchor).with_target(target);
        if let Some(text) = caps.get(2) {
            anchor.inlines = parse_inline(text.as_str().trim(), self.attributes);
        }
        anchor
            .attributes
            .insert("type".to_owned(), "xref".to_owned());
        Some((anchor, caps[0].len()))
    }

    fn match_quoted(
        &self,
        rest: &str,
        prev: Option<char>,
        marker: char,
        kind: &str,
    ) -> Option<(Node, usize)> {
        let double: String = [marker, marker].iter().collect();
        // Unconstrained `**text**` may appear mid-word.
        if let Some(body) = rest.strip_prefix(double.as_str())
            && let Some(end) = body.find(double.as_str())
            && end > 0
        {
            let inner = &body[..end];
            let node = self.quoted(kind, inner);
            return Some((node, end + 4 * marker.len_utf8()));
        }

        // Constrained `*text*` must sit on word boundaries.
        if prev.is_some_and(|c| c.is_alphanumeric() || c == marker) {
            return None;
        }
        let body = &rest[marker.len_utf8()..];
        if body.starts_with(char::is_whitespace) {
            return None;
        }
        let end = body.find(marker)?;
        if end == 0 || body[..end].ends_with(char::is_whitespace) {
            return None;
        }
        let after = body[end + marker.len_utf8()..].chars().next();
        if after.is_some_and(char::is_alphanumeric) {
            return None;
        }
        let node = self.quoted(kind, &body[..end]);
        Some((node, end + 2 * marker.len_utf8()))
    }

    /// Superscript and subscript: no word boundaries, no whitespace inside.
    fn match_script(&self, rest: &str, marker: char, kind: &str) -> Option<(Node, usize)> {
        let body = &rest[marker.len_utf8()..];
        let end = body.find(marker)?;
        if end == 0 || body[..end].contains(char::is_whitespace) {
            return None;
        }
        let node = self.quoted(kind, &body[..end]);
        Some((node, end + 2 * marker.len_utf8()))
    }

    fn quoted(&self, kind: &str, inner: &str) -> Node {
        Node::new(NodeKind::InlineQuoted)
            .with_style(kind)
            .with_inlines(InlineScanner::new(inner, self.attributes).scan())
    }

    /// Build an anchor from a target and the bracketed text/attribute list.
    fn anchor(&self, target: &str, bracket: &str) -> Node {
        let mut anchor = Node::new(NodeKind::InlineAnchor).with_target(target);
        let mut text = bracket;
        if bracket.contains('=') {
            text = "";
            for (index, item) in split_attr_list(bracket).into_iter().enumerate() {
                match item.split_once('=') {
                    Some((key, value)) => {
                        let value = value.trim().trim_matches('"');
                        anchor
                            .attributes
                            .insert(key.trim().to_owned(), value.to_owned());
                    }
                    None if index == 0 => text = item,
                    None => {}
                }
            }
        }
        let text = text.trim().trim_matches('"');
        if !text.is_empty() {
            anchor.inlines = parse_inline(text, self.attributes);
        }
        anchor
    }
}

fn match_monospaced(rest: &str) -> Option<(Node, usize)> {
    let caps = MONOSPACED_RE.captures(rest)?;
    let node = Node::new(NodeKind::InlineQuoted)
        .with_style("monospaced")
        .with_inlines(vec![Node::text(&caps[1])]);
    Some((node, caps[0].len()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Vec<Node> {
        parse_inline(text, &Attributes::new())
    }

    fn quoted(kind: &str, text: &str) -> Node {
        Node::new(NodeKind::InlineQuoted)
            .with_style(kind)
            .with_inlines(vec![Node::text(text)])
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("just text"), vec![Node::text("just text")]);
    }

    #[test]
    fn test_constrained_quotes() {
        assert_eq!(
            parse("a *bold* and _em_ and `code`"),
            vec![
                Node::text("a "),
                quoted("strong", "bold"),
                Node::text(" and "),
                quoted("emphasis", "em"),
                Node::text(" and "),
                quoted("monospaced", "code"),
            ]
        );
    }

    #[test]
    fn test_constrained_quote_needs_word_boundary() {
        assert_eq!(parse("2*3*4"), vec![Node::text("2*3*4")]);
        assert_eq!(parse("snake_case_name"), vec![Node::text("snake_case_name")]);
    }

    #[test]
    fn test_unconstrained_strong() {
        assert_eq!(
            parse("un**bold**ed"),
            vec![
                Node::text("un"),
                quoted("strong", "bold"),
                Node::text("ed")
            ]
        );
    }

    #[test]
    fn test_nested_quotes() {
        let nodes = parse("*very _nested_*");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].style.as_deref(), Some("strong"));
        assert_eq!(nodes[0].inlines[1], quoted("emphasis", "nested"));
    }

    #[test]
    fn test_mark_and_superscript() {
        assert_eq!(parse("#hi#")[0].style.as_deref(), Some("mark"));
        assert_eq!(parse("E=mc^2^")[1].style.as_deref(), Some("superscript"));
    }

    #[test]
    fn test_url_with_text() {
        let nodes = parse("see https://Example.com/a---b.franklin[the page] now");
        assert_eq!(nodes[0], Node::text("see "));
        let anchor = &nodes[1];
        assert_eq!(anchor.kind, NodeKind::InlineAnchor);
        assert_eq!(
            anchor.target.as_deref(),
            Some("https://Example.com/a---b.franklin")
        );
        assert_eq!(anchor.plain_text(), "the page");
        assert_eq!(nodes[2], Node::text(" now"));
    }

    #[test]
    fn test_bare_url_drops_trailing_punctuation() {
        let nodes = parse("Visit https://example.com.");
        assert_eq!(nodes[1].target.as_deref(), Some("https://example.com"));
        assert!(nodes[1].inlines.is_empty());
        assert_eq!(nodes[2], Node::text("."));
    }

    #[test]
    fn test_link_macro_with_role() {
        let nodes = parse("link:./sub.adoc[role=include]");
        let anchor = &nodes[0];
        assert_eq!(anchor.target.as_deref(), Some("./sub.adoc"));
        assert_eq!(anchor.role(), Some("include"));
        assert!(anchor.inlines.is_empty());
    }

    #[test]
    fn test_link_macro_with_text_and_role() {
        let nodes = parse(r#"xref:other.adoc["Other page", role=ext]"#);
        let anchor = &nodes[0];
        assert_eq!(anchor.attr("type"), Some("xref"));
        assert_eq!(anchor.role(), Some("ext"));
        assert_eq!(anchor.plain_text(), "Other page");
    }

    #[test]
    fn test_internal_xref() {
        let nodes = parse("see <<setup,Setup>>");
        assert_eq!(nodes[1].target.as_deref(), Some("#setup"));
        assert_eq!(nodes[1].plain_text(), "Setup");
    }

    #[test]
    fn test_attribute_substitution() {
        let mut attributes = Attributes::new();
        attributes.insert("product".to_owned(), "Blockdoc".to_owned());
        assert_eq!(
            substitute_attributes("Use {product} and {unknown}", &attributes),
            "Use Blockdoc and {unknown}"
        );
    }
}
