//! Ordered, unordered and description lists.

use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use crate::error::ParseError;
use crate::node::{DescriptionEntry, Node, NodeKind};

static UNORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\*{1,5}|-)\s+(\S.*)$").unwrap());

static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\.{1,5}|\d{1,9}\.)\s+(\S.*)$").unwrap());

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^\s:;].*?)(:{2,4}|;;)(?:\s+(\S.*))?$").unwrap());

/// List item marker. Items with equal markers are siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListMarker {
    /// `*` through `*****`, or `-`.
    Unordered(String),
    /// `.` through `.....`; explicit numbers (`1.`) all map to `.`.
    Ordered(String),
    /// `::`, `:::`, `::::` or `;;`.
    Description(String),
}

/// A line that starts a list item.
#[derive(Debug)]
pub(crate) struct ListLine<'a> {
    pub(crate) marker: ListMarker,
    /// Item text, or the term for description lists.
    pub(crate) text: &'a str,
    /// Description text following a term on the same line.
    pub(crate) rest: Option<&'a str>,
}

pub(crate) fn list_line(line: &str) -> Option<ListLine<'_>> {
    if let Some(caps) = UNORDERED_RE.captures(line) {
        return Some(ListLine {
            marker: ListMarker::Unordered(caps[1].to_owned()),
            text: caps.get(2)?.as_str().trim_end(),
            rest: None,
        });
    }
    if let Some(caps) = ORDERED_RE.captures(line) {
        let marker = &caps[1];
        let marker = if marker.starts_with('.') { marker } else { "." };
        return Some(ListLine {
            marker: ListMarker::Ordered(marker.to_owned()),
            text: caps.get(2)?.as_str().trim_end(),
            rest: None,
        });
    }
    let caps = DESCRIPTION_RE.captures(line)?;
    Some(ListLine {
        marker: ListMarker::Description(caps[2].to_owned()),
        text: caps.get(1)?.as_str().trim(),
        rest: caps.get(3).map(|m| m.as_str().trim_end()),
    })
}

impl<'a> BlockParser<'a, '_> {
    /// Parse a list starting at the cursor. `ancestors` are the markers of enclosing lists.
    pub(super) fn parse_list(
        &mut self,
        marker: ListMarker,
        ancestors: &[ListMarker],
    ) -> Result<Node, ParseError> {
        let mut lineage = ancestors.to_vec();
        lineage.push(marker.clone());

        self.list_depth += 1;
        let result = match marker {
            ListMarker::Description(_) => self.parse_description_entries(&marker, &lineage).map(|entries| {
                Node::new(NodeKind::DescriptionList).with_entries(entries)
            }),
            _ => self.parse_items(&marker, &lineage).map(|items| {
                let kind = match marker {
                    ListMarker::Unordered(_) => NodeKind::UnorderedList,
                    _ => NodeKind::OrderedList,
                };
                Node::new(kind).with_blocks(items)
            }),
        };
        self.list_depth -= 1;
        result
    }

    fn parse_items(&mut self, marker: &ListMarker, lineage: &[ListMarker]) -> Result<Vec<Node>, ParseError> {
        let mut items = Vec::new();
        while let Some(line) = self.next_list_line() {
            if line.marker != *marker {
                break;
            }
            self.pos += 1;
            let text = self.item_text(line.text);
            let mut item = Node::new(NodeKind::ListItem).with_inlines(self.inline(&text));
            item.blocks = self.item_blocks(lineage)?;
            items.push(item);
        }
        Ok(items)
    }

    fn parse_description_entries(
        &mut self,
        marker: &ListMarker,
        lineage: &[ListMarker],
    ) -> Result<Vec<DescriptionEntry>, ParseError> {
        let mut entries = Vec::new();
        while let Some(first) = self.next_list_line() {
            if first.marker != *marker {
                break;
            }
            self.pos += 1;
            let mut terms = vec![self.term(first.text)];
            let mut rest = first.rest;

            // Adjacent term lines without text share one description.
            while rest.is_none() {
                match self.peek().and_then(list_line) {
                    Some(next) if next.marker == *marker => {
                        self.pos += 1;
                        terms.push(self.term(next.text));
                        rest = next.rest;
                    }
                    _ => break,
                }
            }

            let text = match rest {
                Some(text) => self.item_text(text),
                None => {
                    self.skip_blank();
                    match self.peek() {
                        Some(line) if !self.ends_paragraph(line) && list_line(line).is_none() => {
                            self.pos += 1;
                            self.item_text(line.trim())
                        }
                        _ => String::new(),
                    }
                }
            };
            let blocks = self.item_blocks(lineage)?;
            let description = (!text.is_empty() || !blocks.is_empty()).then(|| {
                Node::new(NodeKind::ListItem)
                    .with_inlines(self.inline(&text))
                    .with_blocks(blocks)
            });
            entries.push(DescriptionEntry { terms, description });
        }
        Ok(entries)
    }

    fn term(&self, text: &str) -> Node {
        Node::new(NodeKind::ListItem).with_inlines(self.inline(text))
    }

    /// Next list item line, skipping blank lines. Leaves the cursor on it when found.
    fn next_list_line(&mut self) -> Option<ListLine<'a>> {
        let mut pos = self.pos;
        while self.lines.get(pos).is_some_and(|l| l.trim().is_empty()) {
            pos += 1;
        }
        let item = list_line(self.lines.get(pos).copied()?)?;
        self.pos = pos;
        Some(item)
    }

    /// Item text: the first line plus wrapped continuation lines.
    fn item_text(&mut self, first: &str) -> String {
        let mut text = first.to_owned();
        while let Some(line) = self.peek() {
            if self.ends_paragraph(line) {
                break;
            }
            text.push('\n');
            text.push_str(line.trim());
            self.pos += 1;
        }
        text
    }

    /// Blocks attached to an item with `+` and nested lists with other markers.
    fn item_blocks(&mut self, lineage: &[ListMarker]) -> Result<Vec<Node>, ParseError> {
        let mut blocks = Vec::new();
        loop {
            if self.peek().is_some_and(|l| l.trim() == "+") {
                self.pos += 1;
                let meta = self.read_meta();
                if let Some(block) = self.parse_block(meta)? {
                    blocks.push(block);
                }
                continue;
            }

            let save = self.pos;
            match self.next_list_line() {
                Some(next) if !lineage.contains(&next.marker) => {
                    blocks.push(self.parse_list(next.marker, lineage)?);
                }
                _ => {
                    self.pos = save;
                    break;
                }
            }
        }
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::node::{Attributes, Document};
    use crate::{AsciiDocParser, MarkupParser};

    use super::*;

    fn parse(source: &str) -> Document {
        AsciiDocParser::new()
            .parse(source, &Attributes::new())
            .unwrap()
    }

    #[test]
    fn test_list_line_markers() {
        let line = list_line("** nested").unwrap();
        assert_eq!(line.marker, ListMarker::Unordered("**".to_owned()));
        assert_eq!(line.text, "nested");

        let line = list_line("3. third").unwrap();
        assert_eq!(line.marker, ListMarker::Ordered(".".to_owned()));

        let line = list_line("CPU:: The brain").unwrap();
        assert_eq!(line.marker, ListMarker::Description("::".to_owned()));
        assert_eq!(line.text, "CPU");
        assert_eq!(line.rest, Some("The brain"));

        assert!(list_line("image::a.png[]").is_none());
        assert!(list_line("****").is_none());
        assert!(list_line("plain text").is_none());
    }

    #[test]
    fn test_unordered_list_items() {
        let doc = parse("* one\n* two\n  wrapped\n* three");
        let list = &doc.root.blocks[0];
        assert_eq!(list.kind, NodeKind::UnorderedList);
        assert_eq!(list.blocks.len(), 3);
        assert_eq!(list.blocks[1].plain_text(), "two\nwrapped");
    }

    #[test]
    fn test_nested_lists_return_to_parent() {
        let doc = parse("* a\n** a1\n. a1x\n** a2\n* b");
        let list = &doc.root.blocks[0];
        assert_eq!(list.blocks.len(), 2);

        let nested = &list.blocks[0].blocks[0];
        assert_eq!(nested.kind, NodeKind::UnorderedList);
        assert_eq!(nested.blocks.len(), 2);
        assert_eq!(nested.blocks[0].blocks[0].kind, NodeKind::OrderedList);
        assert_eq!(list.blocks[1].plain_text(), "b");
    }

    #[test]
    fn test_continuation_attaches_block() {
        let doc = parse(". Install\n+\n----\ncargo install\n----\n. Run");
        let list = &doc.root.blocks[0];
        assert_eq!(list.kind, NodeKind::OrderedList);
        assert_eq!(list.blocks.len(), 2);
        assert_eq!(list.blocks[0].blocks[0].kind, NodeKind::Listing);
    }

    #[test]
    fn test_procedure_role_on_list() {
        let doc = parse("[.procedure]\n. first\n. second");
        let list = &doc.root.blocks[0];
        assert!(list.has_role("procedure"));
        assert_eq!(list.blocks.len(), 2);
    }

    #[test]
    fn test_description_list_multi_term() {
        let doc = parse("CPU::\nProcessor::\nThe brain.\n\nRAM:: Memory\n\nDisk::");
        let list = &doc.root.blocks[0];
        assert_eq!(list.kind, NodeKind::DescriptionList);
        assert_eq!(list.entries.len(), 3);

        let first = &list.entries[0];
        assert_eq!(first.terms.len(), 2);
        assert_eq!(first.terms[1].plain_text(), "Processor");
        assert_eq!(
            first.description.as_ref().map(Node::plain_text).as_deref(),
            Some("The brain.")
        );
        assert_eq!(
            list.entries[1].description.as_ref().map(Node::plain_text).as_deref(),
            Some("Memory")
        );
        assert!(list.entries[2].description.is_none());
    }
}
