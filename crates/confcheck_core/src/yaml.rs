//! YAML document loading with line markers.
//!
//! Documents are parsed with `serde_yaml` and converted into [`Node`]
//! trees. Every block mapping with at least one key found in the source
//! gets a start-line marker (the line of its first found key) and an
//! end-line marker (the last non-blank, non-comment line of its last found
//! entry) appended after its entries. Keys are matched to source lines by
//! position, so spellings that differ from the parsed value (`0x10`,
//! escaped or tagged keys) are still found. Flow collections (`{..}`,
//! `[..]`) and aliased values carry no markers.
//!
//! Keys spelled like YAML 1.1 booleans (`on`, `yes`, `off`, ...) become
//! [`Key::Bool`], so a workflow's `on:` section is found under `true`.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::document::{Key, Mapping, Node, ParsedFile, raw_lines};

/// Reads and parses a YAML file. Unreadable, empty or invalid files yield `None`.
pub fn parse_yaml_file(path: &Path) -> Option<ParsedFile> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let parsed = parse_yaml_str(&content);
            if parsed.is_none() {
                debug!("No YAML document in {}", path.display());
            }
            parsed
        }
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Parses YAML source text. Empty or invalid content yields `None`.
pub fn parse_yaml_str(content: &str) -> Option<ParsedFile> {
    let value: Value = match serde_yaml::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            debug!("Invalid YAML: {}", e);
            return None;
        }
    };
    if value.is_null() {
        return None;
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut locator = Locator {
        lines: &lines,
        next: 0,
    };
    let document = locator.convert(&value, 0, true);
    Some(ParsedFile::new(document, raw_lines(content)))
}

/// Reads a YAML 1.1 boolean spelling.
fn yaml11_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Some(true),
        "off" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn convert_key(key: &Value) -> Option<Key> {
    match key {
        Value::String(s) => Some(yaml11_bool(s).map_or_else(|| Key::Str(s.clone()), Key::Bool)),
        Value::Bool(b) => Some(Key::Bool(*b)),
        Value::Number(n) => Some(n.as_i64().map_or_else(|| Key::Str(n.to_string()), Key::Int)),
        Value::Null => Some(Key::Str("null".to_string())),
        Value::Tagged(tagged) => convert_key(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn number_node(n: &serde_yaml::Number) -> Node {
    n.as_i64()
        .map(Node::Int)
        .or_else(|| n.as_f64().map(Node::Float))
        .unwrap_or(Node::Null)
}

/// Whether the source token of a key spells the parsed key literally.
fn key_matches(token: &str, key: &Value) -> bool {
    match key {
        Value::String(s) => token == s,
        Value::Bool(b) => token.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        Value::Number(n) => match (token.parse::<i64>().ok(), n.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => token == n.to_string(),
        },
        Value::Null => token == "~" || token.eq_ignore_ascii_case("null"),
        Value::Tagged(tagged) => key_matches(token, &tagged.value),
        _ => false,
    }
}

fn indent(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

/// Non-blank and not a comment.
fn is_content(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn is_dash_line(text: &str) -> bool {
    let rest = text.trim_start_matches(' ');
    rest == "-" || rest.starts_with("- ")
}

fn is_document_marker(text: &str) -> bool {
    text.starts_with("---") || text.starts_with("...")
}

/// Column of the first character after indentation and sequence dashes.
fn content_column(text: &str) -> usize {
    strip_dashes(text).0
}

fn strip_dashes(text: &str) -> (usize, &str) {
    let mut column = indent(text);
    let mut rest = &text[column..];
    while let Some(after) = rest.strip_prefix('-') {
        if !(after.is_empty() || after.starts_with(' ')) {
            break;
        }
        let trimmed = after.trim_start_matches(' ');
        column += rest.len() - trimmed.len();
        rest = trimmed;
    }
    (column, rest)
}

/// A block mapping key as written on a source line.
struct KeyText<'a> {
    column: usize,
    token: &'a str,
    value: &'a str,
}

impl<'a> KeyText<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let (column, rest) = strip_dashes(text);
        if rest.is_empty() || rest.starts_with(['#', '{', '[', '?']) {
            return None;
        }

        let (token, after) = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let close = Self::closing_quote(rest, quote)?;
                (&rest[1..close], rest[close + 1..].trim_start())
            }
            _ => {
                let colon = Self::key_colon(rest)?;
                let token = rest[..colon].trim_end();
                if token.is_empty() {
                    return None;
                }
                (token, &rest[colon..])
            }
        };

        let value = after.strip_prefix(':')?;
        if !(value.is_empty() || value.starts_with([' ', '\t'])) {
            return None;
        }
        Some(Self {
            column,
            token,
            value: value.trim(),
        })
    }

    /// Byte offset of the quote closing a quoted key that opens `rest`.
    ///
    /// Double quotes escape with a backslash, single quotes by doubling.
    fn closing_quote(rest: &str, quote: char) -> Option<usize> {
        let mut chars = rest.char_indices().skip(1).peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' if quote == '"' => {
                    chars.next();
                }
                '\'' if quote == '\'' && chars.peek().is_some_and(|&(_, n)| n == '\'') => {
                    chars.next();
                }
                c if c == quote => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Byte offset of the `:` ending a plain key.
    fn key_colon(rest: &str) -> Option<usize> {
        let bytes = rest.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b':' if matches!(bytes.get(i + 1), None | Some(b' ') | Some(b'\t')) => {
                    return Some(i);
                }
                b'#' if i > 0 && matches!(bytes[i - 1], b' ' | b'\t') => return None,
                _ => {}
            }
        }
        None
    }

    /// The value starts on this line as a flow collection or an alias.
    fn has_inline_collection(&self) -> bool {
        let mut value = self.value;
        while value.starts_with(['&', '!']) {
            value = value
                .split_once(char::is_whitespace)
                .map_or("", |(_, rest)| rest.trim_start());
        }
        value.starts_with(['{', '[', '*'])
    }
}

struct KeyPosition {
    line: usize,
    column: usize,
    inline: bool,
}

/// Walks the parsed value in document order while a cursor moves forward
/// through the source lines.
struct Locator<'a> {
    lines: &'a [&'a str],
    /// Index of the first line not yet attributed.
    next: usize,
}

impl Locator<'_> {
    fn convert(&mut self, value: &Value, min_column: usize, locate: bool) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => number_node(n),
            Value::String(s) => Node::Str(s.clone()),
            Value::Sequence(items) => Node::Seq(
                items
                    .iter()
                    .map(|item| self.convert(item, min_column, locate))
                    .collect(),
            ),
            Value::Mapping(map) => self.convert_mapping(map, min_column, locate),
            Value::Tagged(tagged) => self.convert(&tagged.value, min_column, locate),
        }
    }

    fn convert_mapping(&mut self, map: &serde_yaml::Mapping, min_column: usize, locate: bool) -> Node {
        let positions = if locate {
            self.locate_keys(map, min_column)
        } else {
            Vec::new()
        };

        let mut mapping = Mapping::new();
        for (index, (key, value)) in map.iter().enumerate() {
            let node = match positions.get(index).and_then(Option::as_ref) {
                Some(position) => {
                    self.next = position.line + 1;
                    self.convert(value, position.column + 1, !position.inline)
                }
                None => self.convert(value, min_column, false),
            };
            match convert_key(key) {
                Some(key) => mapping.push(key, node),
                None => debug!("Skipping non-scalar mapping key {:?}", key),
            }
        }

        let mut located = positions.iter().flatten();
        if let Some(first) = located.next() {
            let last = located.last().unwrap_or(first);
            let end = self.block_end(last.line, first.column);
            mapping = mapping.with_lines(first.line + 1, end + 1);
            self.next = self.next.max(end + 1);
        }

        Node::Map(mapping)
    }

    /// Finds the source line of each key, in order, at one shared column.
    ///
    /// The n-th key line of the block belongs to the n-th key whatever its
    /// spelling. Non-scalar keys and keys left over once the block ends get
    /// `None`.
    fn locate_keys(&self, map: &serde_yaml::Mapping, min_column: usize) -> Vec<Option<KeyPosition>> {
        let mut positions = Vec::with_capacity(map.len());
        let mut column: Option<usize> = None;
        let mut line = self.next;
        let mut ended = false;

        for key in map.keys() {
            if ended || convert_key(key).is_none() {
                positions.push(None);
                continue;
            }

            let position = loop {
                let Some(text) = self.lines.get(line) else {
                    break None;
                };
                let index = line;
                line += 1;

                if !is_content(text) {
                    continue;
                }
                let outside = match column {
                    Some(col) => indent(text) < col,
                    None => content_column(text) < min_column,
                };
                if outside {
                    break None;
                }

                let Some(entry) = KeyText::parse(text) else {
                    continue;
                };
                if column.is_some_and(|col| entry.column != col) {
                    continue;
                }
                if !key_matches(entry.token, key) {
                    debug!("Key {:?} is spelled {:?} on line {}", key, entry.token, index + 1);
                }

                column = Some(entry.column);
                break Some(KeyPosition {
                    line: index,
                    column: entry.column,
                    inline: entry.has_inline_collection(),
                });
            };
            ended = position.is_none();
            positions.push(position);
        }

        positions
    }

    /// Last content line belonging to a mapping at `column` whose last key
    /// sits on `last_key_line`.
    fn block_end(&self, last_key_line: usize, column: usize) -> usize {
        let mut end = last_key_line;
        for (index, text) in self.lines.iter().enumerate().skip(last_key_line + 1) {
            if !is_content(text) {
                continue;
            }
            let depth = indent(text);
            if depth < column || (depth == column && !is_dash_line(text)) || is_document_marker(text) {
                break;
            }
            end = index;
        }
        end
    }
}
