//! Parsed document model shared by parsers, registries and the runner.
//!
//! A document is an ordered tree. Mappings keep their entries in source
//! order and may carry synthetic line markers (`Key::StartLine` /
//! `Key::EndLine`) whose values are 1-based line numbers. Markers are
//! ordinary entries, so a parser may interleave them with sibling keys.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Rendered name of the start-line marker key.
pub const START_LINE: &str = "__startline__";

/// Rendered name of the end-line marker key.
pub const END_LINE: &str = "__endline__";

/// A mapping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Synthetic start-line marker.
    StartLine,
    /// Synthetic end-line marker.
    EndLine,
}

impl Key {
    /// Returns true for the two synthetic line-marker keys.
    pub fn is_line_marker(&self) -> bool {
        matches!(self, Key::StartLine | Key::EndLine)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::StartLine => f.write_str(START_LINE),
            Key::EndLine => f.write_str(END_LINE),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

/// A node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Node>),
    Map(Mapping),
}

impl Node {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a line number. Negative values are rejected.
    pub fn as_line(&self) -> Option<usize> {
        self.as_i64().and_then(|i| usize::try_from(i).ok())
    }

    /// Looks up a string key when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?.get_str(key)
    }
}

/// An ordered list of key/value entries.
///
/// Lookups return the first entry with a matching key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(Key, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<Key>, value: Node) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style variant of [`Mapping::push`].
    pub fn with(mut self, key: impl Into<Key>, value: Node) -> Self {
        self.push(key, value);
        self
    }

    /// Appends start/end line markers.
    pub fn with_lines(mut self, start: usize, end: usize) -> Self {
        self.push(Key::StartLine, Node::Int(start as i64));
        self.push(Key::EndLine, Node::Int(end as i64));
        self
    }

    pub fn get(&self, key: &Key) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, Node)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Value of the first start-line marker.
    pub fn start_line(&self) -> Option<usize> {
        self.get(&Key::StartLine).and_then(Node::as_line)
    }

    /// Value of the first end-line marker.
    pub fn end_line(&self) -> Option<usize> {
        self.get(&Key::EndLine).and_then(Node::as_line)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Key, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Key, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One line of source text, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Splits source text into 1-based raw lines.
pub fn raw_lines(content: &str) -> Vec<RawLine> {
    content
        .lines()
        .enumerate()
        .map(|(i, text)| RawLine::new(i + 1, text))
        .collect()
}

/// A successfully parsed file: its document plus the raw source lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub document: Node,
    pub lines: Vec<RawLine>,
}

impl ParsedFile {
    pub fn new(document: Node, lines: Vec<RawLine>) -> Self {
        Self { document, lines }
    }
}

/// Returns true when the path has one of the given extensions.
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| ext.eq_ignore_ascii_case(x)))
}
