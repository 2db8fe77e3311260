//! `|===` tables.
//!
//! Cells are separated by `|`. A cell spec directly before the separator
//! sets the cell style (`a|` parses the cell as blocks) or repeats it
//! (`3*|`). The column count comes from `cols`, otherwise from the first
//! line that holds cells; that line becomes the header row when a blank
//! line follows it.

use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use super::attrs::BlockMeta;
use crate::error::ParseError;
use crate::node::{Cell, Node, NodeKind, Row, Table};

/// Upper bound for `cols` and for a cell's `N*` repeat count.
const MAX_COLUMNS: usize = 1000;

static CELL_SPEC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)\*)?(?:\d+(?:\.\d+)?\+)?[<^>]?(?:\.[<^>])?([adehlmsv])?$").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellSpec {
    repeat: usize,
    style: Option<char>,
}

impl Default for CellSpec {
    fn default() -> Self {
        Self {
            repeat: 1,
            style: None,
        }
    }
}

fn cell_spec(token: &str) -> Option<CellSpec> {
    let caps = CELL_SPEC_RE.captures(token)?;
    let repeat = caps
        .get(1)
        .map_or(1, |m| m.as_str().parse().unwrap_or(usize::MAX));
    let style = caps.get(2).and_then(|m| m.as_str().chars().next());
    Some(CellSpec { repeat, style })
}

/// Split the trailing cell spec off a segment: `"text a"` gives `("text", spec a)`.
///
/// The spec must touch the separator and stand alone as a word.
fn trailing_spec(segment: &str) -> (&str, CellSpec) {
    if segment.ends_with(char::is_whitespace) {
        return (segment, CellSpec::default());
    }
    let start = segment
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + 1);
    let token = &segment[start..];
    match cell_spec(token) {
        Some(spec) if !token.is_empty() => (&segment[..start], spec),
        _ => (segment, CellSpec::default()),
    }
}

/// Split a line on unescaped `|`, unescaping `\|`.
fn split_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.push('|');
            }
            '|' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Column count from a `cols` value: `3`, `1,2,1`, `3*`, `2*,1`.
fn column_count(cols: &str) -> Option<usize> {
    let cols = cols.trim();
    if let Ok(n) = cols.parse() {
        return Some(n);
    }
    cols.split([',', ';']).try_fold(0usize, |total, item| {
        let n = match item.trim().split_once('*') {
            Some((n, _)) => n.trim().parse::<usize>().ok()?,
            None => 1,
        };
        total.checked_add(n)
    })
}

#[derive(Debug)]
struct RawCell {
    text: String,
    style: Option<char>,
    line: usize,
}

/// Cells scanned from table content.
#[derive(Debug, Default)]
struct ScannedCells {
    cells: Vec<RawCell>,
    /// Cells on the first line holding cells.
    first_line_cells: usize,
    /// Whether a blank line follows that first line.
    first_line_blank_after: bool,
}

fn scan_cells(content: &[&str], first_line: usize) -> Result<ScannedCells, ParseError> {
    let mut scanned = ScannedCells::default();
    let mut seen_row = false;

    for (i, line) in content.iter().enumerate() {
        let line_no = first_line + i;
        if line.trim().is_empty() {
            if let Some(cell) = scanned.cells.last_mut()
                && !cell.text.is_empty()
            {
                cell.text.push('\n');
            }
            continue;
        }

        let mut segments = split_segments(line).into_iter();
        let lead = segments.next().unwrap_or_default();
        let rest: Vec<String> = segments.collect();

        let continuation = |scanned: &mut ScannedCells, text: &str| -> Result<(), ParseError> {
            let cell = scanned.cells.last_mut().ok_or_else(|| ParseError::InvalidTable {
                line: line_no,
                message: "content before the first cell".to_owned(),
            })?;
            if !cell.text.is_empty() {
                cell.text.push('\n');
            }
            cell.text.push_str(text.trim());
            Ok(())
        };

        if rest.is_empty() {
            continuation(&mut scanned, &lead)?;
            continue;
        }

        let mut spec = match cell_spec(&lead) {
            Some(spec) => spec,
            None => {
                continuation(&mut scanned, &lead)?;
                CellSpec::default()
            }
        };

        let too_many = |spec: CellSpec| {
            if spec.repeat > MAX_COLUMNS {
                Err(ParseError::InvalidTable {
                    line: line_no,
                    message: format!("cell repeat count exceeds {MAX_COLUMNS}"),
                })
            } else {
                Ok(())
            }
        };

        let before = scanned.cells.len();
        let last = rest.len() - 1;
        for (j, segment) in rest.iter().enumerate() {
            let (text, next_spec) = if j < last {
                trailing_spec(segment)
            } else {
                (segment.as_str(), CellSpec::default())
            };
            too_many(spec)?;
            for _ in 0..spec.repeat {
                scanned.cells.push(RawCell {
                    text: text.trim().to_owned(),
                    style: spec.style,
                    line: line_no,
                });
            }
            spec = next_spec;
        }

        if !seen_row {
            seen_row = true;
            scanned.first_line_cells = scanned.cells.len() - before;
            scanned.first_line_blank_after = content
                .get(i + 1)
                .is_some_and(|next| next.trim().is_empty());
        }
    }
    Ok(scanned)
}

impl BlockParser<'_, '_> {
    pub(super) fn parse_table(&mut self, meta: &BlockMeta) -> Result<Node, ParseError> {
        let open_line = self.line_no();
        let (content, first_line) = self.collect_delimited("table")?;
        let scanned = scan_cells(&content, first_line)?;

        let cols = match meta.named.get("cols") {
            Some(cols) => column_count(cols).ok_or_else(|| ParseError::InvalidTable {
                line: open_line,
                message: format!("invalid cols value {cols:?}"),
            })?,
            None => scanned.first_line_cells,
        };
        if cols > MAX_COLUMNS {
            return Err(ParseError::InvalidTable {
                line: open_line,
                message: format!("table has more than {MAX_COLUMNS} columns"),
            });
        }
        if cols == 0 {
            return if scanned.cells.is_empty() {
                Ok(Node::new(NodeKind::Table).with_table(Table::default()))
            } else {
                Err(ParseError::InvalidTable {
                    line: open_line,
                    message: "table has no columns".to_owned(),
                })
            };
        }

        let implicit_header =
            scanned.first_line_blank_after && scanned.first_line_cells == cols;
        let has_header =
            meta.has_option("header") || (implicit_header && !meta.has_option("noheader"));

        let mut rows: Vec<Row> = Vec::new();
        let mut cells = scanned.cells.into_iter().peekable();
        while cells.peek().is_some() {
            let header_row = has_header && rows.is_empty();
            let mut row = Vec::new();
            for raw in cells.by_ref().take(cols) {
                row.push(self.cell(raw, header_row)?);
            }
            rows.push(row);
        }

        let mut table = Table::default();
        let mut rows = rows.into_iter();
        if has_header {
            table.head.extend(rows.next());
        }
        table.body = rows.collect();
        if meta.has_option("footer")
            && let Some(foot) = table.body.pop()
        {
            table.foot.push(foot);
        }

        Ok(Node::new(NodeKind::Table).with_table(table))
    }

    fn cell(&mut self, raw: RawCell, header_row: bool) -> Result<Cell, ParseError> {
        if raw.style == Some('a') && !header_row {
            let lines: Vec<&str> = raw.text.lines().collect();
            let blocks = self.parse_children(lines, raw.line)?;
            return Ok(Cell::blocks(blocks));
        }
        let text = raw.text.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(Cell::inline(self.inline(&text)))
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

    fn texts(row: &Row) -> Vec<String> {
        row.iter()
            .map(|c| c.inlines.iter().map(Node::plain_text).collect())
            .collect()
    }

    #[test]
    fn test_column_count() {
        assert_eq!(column_count("3"), Some(3));
        assert_eq!(column_count("1,2,1"), Some(3));
        assert_eq!(column_count("2*,1"), Some(3));
        assert_eq!(column_count("x*"), None);
        assert_eq!(column_count(&format!("{}*,1", usize::MAX)), None);
    }

    #[test]
    fn test_cell_spec() {
        assert_eq!(
            cell_spec("a"),
            Some(CellSpec {
                repeat: 1,
                style: Some('a')
            })
        );
        assert_eq!(cell_spec("2*").map(|s| s.repeat), Some(2));
        assert_eq!(cell_spec("word"), None);
        assert_eq!(trailing_spec("text a").1.style, Some('a'));
        assert_eq!(trailing_spec("text a ").1.style, None);
    }

    #[test]
    fn test_implicit_header() {
        let doc = parse("|===\n|Name |Value\n\n|a |1\n|b |2\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        assert_eq!(table.head.len(), 1);
        assert_eq!(texts(&table.head[0]), vec!["Name", "Value"]);
        assert_eq!(table.body.len(), 2);
        assert_eq!(texts(&table.body[1]), vec!["b", "2"]);
    }

    #[test]
    fn test_cols_and_one_cell_per_line() {
        let doc = parse("[%noheader,cols=\"2\"]\n|===\n|a\n|b\n\n|c\n|d\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        assert!(table.head.is_empty());
        assert_eq!(table.body.len(), 2);
        assert_eq!(texts(&table.body[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_header_and_footer_options() {
        let doc = parse("[%header%footer]\n|===\n|h1 |h2\n|a |b\n|f1 |f2\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        assert_eq!(texts(&table.head[0]), vec!["h1", "h2"]);
        assert_eq!(table.body.len(), 1);
        assert_eq!(texts(&table.foot[0]), vec!["f1", "f2"]);
    }

    #[test]
    fn test_asciidoc_cell_parses_blocks() {
        let doc = parse("[cols=\"1,1\"]\n|===\n|plain a|* one\n* two\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        let row = &table.body[0];
        assert_eq!(row[1].blocks[0].kind, NodeKind::UnorderedList);
        assert_eq!(row[1].blocks[0].blocks.len(), 2);
    }

    #[test]
    fn test_ragged_last_row_is_kept_short() {
        let doc = parse("[cols=\"3\"]\n|===\n|a |b |c\n|d\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        assert_eq!(table.body[1].len(), 1);
    }

    #[test]
    fn test_escaped_pipe_and_title() {
        let doc = parse(".Options (wide)\n|===\n|a \\| b\n|===");
        let node = &doc.root.blocks[0];
        assert_eq!(node.title.as_deref(), Some("Options (wide)"));
        let table = node.table.as_ref().unwrap();
        assert_eq!(texts(&table.body[0]), vec!["a | b"]);
    }

    #[test]
    fn test_oversized_cols_is_invalid() {
        let err = AsciiDocParser::new()
            .parse("[cols=\"99999999999\"]\n|===\n|a\n|===", &Attributes::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidTable { line: 2, .. }));
    }

    #[test]
    fn test_oversized_repeat_is_invalid() {
        let err = AsciiDocParser::new()
            .parse("|===\n99999999999*|a\n|===", &Attributes::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidTable { line: 2, .. }));

        let doc = parse("|===\n3*|x\n|===");
        let table = doc.root.blocks[0].table.as_ref().unwrap();
        assert_eq!(texts(&table.body[0]), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_text_before_first_cell_is_invalid() {
        let err = AsciiDocParser::new()
            .parse("|===\nstray\n|===", &Attributes::new())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidTable { line: 2, .. }));
    }
}
