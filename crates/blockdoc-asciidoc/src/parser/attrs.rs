//! Block metadata: attribute lists, block titles and anchors.
//!
//! Handles the lines that precede a block and configure it:
//! - `[style#id.role%option, positional, key=value]`
//! - `.Block title`
//! - `[[anchor]]`

use std::collections::BTreeSet;

use crate::node::Attributes;

/// Metadata collected from the lines preceding a block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BlockMeta {
    /// Positional attributes; the first one is the block style.
    pub(crate) positional: Vec<String>,
    /// Named attributes (`key=value`).
    pub(crate) named: Attributes,
    pub(crate) id: Option<String>,
    pub(crate) roles: Vec<String>,
    pub(crate) options: Vec<String>,
    pub(crate) title: Option<String>,
}

impl BlockMeta {
    /// Block style (first positional attribute), if any.
    pub(crate) fn style(&self) -> Option<&str> {
        self.positional
            .first()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub(crate) fn positional(&self, index: usize) -> Option<&str> {
        self.positional
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub(crate) fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Merge an attribute list (the content between `[` and `]`).
    pub(crate) fn merge_attr_list(&mut self, content: &str) {
        for (index, item) in split_attr_list(content).into_iter().enumerate() {
            if let Some((key, value)) = item.split_once('=') {
                let key = key.trim();
                let value = unquote(value.trim());
                match key {
                    "role" => self.roles.extend(value.split_whitespace().map(str::to_owned)),
                    "id" => self.id = Some(value.to_owned()),
                    "options" | "opts" => self
                        .options
                        .extend(value.split(',').map(|o| o.trim().to_owned())),
                    _ => {
                        self.named.insert(key.to_owned(), value.to_owned());
                    }
                }
            } else if index == 0 {
                self.merge_shorthand(item.trim());
            } else {
                self.positional.push(unquote(item.trim()).to_owned());
            }
        }
    }

    /// Parse `style#id.role.role%option` shorthand in the first position.
    fn merge_shorthand(&mut self, item: &str) {
        let style_end = item.find(['#', '.', '%']).unwrap_or(item.len());
        self.positional.push(item[..style_end].to_owned());

        let mut rest = &item[style_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.', '%']).unwrap_or(body.len());
            let value = &body[..end];
            if !value.is_empty() {
                match marker {
                    '#' => self.id = Some(value.to_owned()),
                    '.' => self.roles.push(value.to_owned()),
                    _ => self.options.push(value.to_owned()),
                }
            }
            rest = &body[end..];
        }
    }

    /// Flatten into node attributes: named attributes plus a joined `role`.
    pub(crate) fn node_attributes(&self) -> Attributes {
        let mut attributes = self.named.clone();
        if !self.roles.is_empty() {
            let mut seen = BTreeSet::new();
            let roles: Vec<&str> = self
                .roles
                .iter()
                .map(String::as_str)
                .filter(|r| seen.insert(*r))
                .collect();
            attributes.insert("role".to_owned(), roles.join(" "));
        }
        if !self.options.is_empty() {
            attributes.insert("options".to_owned(), self.options.join(","));
        }
        attributes
    }
}

/// Split an attribute list on commas that are not inside double quotes.
pub(crate) fn split_attr_list(content: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in content.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&content[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < content.len() || !items.is_empty() {
        items.push(&content[start..]);
    }
    items
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Block anchor line: `[[id]]` or `[[id,reftext]]`.
pub(crate) fn anchor_line(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("[[")?.strip_suffix("]]")?;
    let id = inner.split(',').next().unwrap_or_default().trim();
    (!id.is_empty() && !id.contains(char::is_whitespace)).then_some(id)
}

/// Block attribute line: `[...]`, returning the content between the brackets.
pub(crate) fn attr_list_line(line: &str) -> Option<&str> {
    let trimmed = line.trim_end();
    if trimmed.starts_with("[[") {
        return None;
    }
    trimmed.strip_prefix('[')?.strip_suffix(']')
}

/// Block title line: `.Title` (but not `..` or `. item`).
pub(crate) fn title_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('.')?;
    let first = rest.chars().next()?;
    (!first.is_whitespace() && first != '.').then_some(rest.trim_end())
}

/// Attribute entry: `:name: value`, `:name!:` or `:!name:`.
///
/// Returns the name and `Some(value)` to set or `None` to unset.
pub(crate) fn attribute_entry(line: &str) -> Option<(&str, Option<&str>)> {
    let rest = line.strip_prefix(':')?;
    let (name, value) = rest.split_once(':')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    if let Some(name) = name.strip_suffix('!').or_else(|| name.strip_prefix('!')) {
        return Some((name, None));
    }
    Some((name, Some(value.trim())))
}
