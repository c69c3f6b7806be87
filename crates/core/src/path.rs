//! Path expressions
//!
//! A path expression addresses a value nested inside a [`Document`]:
//!
//! | Syntax | Segment | Meaning |
//! |--------|---------|---------|
//! | `name` | [`PathSegment::Key`] | map key |
//! | `name[2]` | [`PathSegment::Index`] | element 2 of the array stored under `name` |
//! | `name["k"]`, `name['k']` | [`PathSegment::MapKey`] | key `k` of the object stored under `name` |
//!
//! Segments are separated by `.`. There is no escaping: a key containing a
//! literal dot cannot be addressed through a path expression, and a quoted
//! map key containing a dot is split like any other segment.
//!
//! Bracket content that is neither an unsigned integer nor a quoted key (with
//! matching quote characters) does not fail the parse: the whole segment,
//! brackets included, becomes a literal [`PathSegment::Key`].
//! [`Path::parse_strict`] rejects those segments instead.
//!
//! [`Document`]: crate::Document

use crate::error::{Error, Result};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A segment in a path expression
///
/// Every segment form starts with a map-key lookup by `name`; `Index` and
/// `MapKey` then descend one more level into the container stored there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Map key: `name`
    Key(String),
    /// Array element: `name[index]`
    Index {
        /// Key of the array in the enclosing object
        name: String,
        /// Element position
        index: usize,
    },
    /// Nested object key: `name["key"]`
    MapKey {
        /// Key of the nested object in the enclosing object
        name: String,
        /// Key inside the nested object
        key: String,
    },
}

impl PathSegment {
    /// The map key looked up in the enclosing object
    pub fn name(&self) -> &str {
        match self {
            PathSegment::Key(name) => name,
            PathSegment::Index { name, .. } => name,
            PathSegment::MapKey { name, .. } => name,
        }
    }

    /// The array index, for `Index` segments
    pub fn index(&self) -> Option<usize> {
        match self {
            PathSegment::Index { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Check if this is a plain key segment
    pub fn is_key(&self) -> bool {
        matches!(self, PathSegment::Key(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => write!(f, "{}", name),
            PathSegment::Index { name, index } => write!(f, "{}[{}]", name, index),
            PathSegment::MapKey { name, key } => write!(f, "{}[\"{}\"]", name, key),
        }
    }
}

/// Outcome of classifying one raw segment
enum SegmentParse {
    Parsed(PathSegment),
    /// Kept as a literal key; the reason is reported by strict parsing
    Literal(&'static str),
}

fn parse_segment(raw: &str) -> SegmentParse {
    if !raw.ends_with(']') {
        return SegmentParse::Parsed(PathSegment::Key(raw.to_string()));
    }
    let open = match raw.find('[') {
        Some(open) => open,
        None => return SegmentParse::Literal("closing ']' without opening '['"),
    };
    let name = &raw[..open];
    if name.is_empty() {
        return SegmentParse::Literal("missing key before '['");
    }
    let inner = raw[open + 1..raw.len() - 1].trim();

    if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        return match inner.parse::<usize>() {
            Ok(index) => SegmentParse::Parsed(PathSegment::Index {
                name: name.to_string(),
                index,
            }),
            Err(_) => SegmentParse::Literal("array index out of range"),
        };
    }

    let bytes = inner.as_bytes();
    if bytes.len() >= 2 {
        let quote = bytes[0];
        if (quote == b'"' || quote == b'\'') && bytes[bytes.len() - 1] == quote {
            return SegmentParse::Parsed(PathSegment::MapKey {
                name: name.to_string(),
                key: inner[1..inner.len() - 1].to_string(),
            });
        }
    }

    SegmentParse::Literal("bracket content is neither an index nor a quoted key")
}

/// A parsed path expression
///
/// # Examples
///
/// ```
/// use ctxdoc_core::path::{Path, PathSegment};
///
/// let path = Path::parse("call.steps[2].params[\"user\"]");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.segments()[1], PathSegment::Index { name: "steps".into(), index: 2 });
///
/// // Unrecognised brackets stay literal
/// let literal = Path::parse("a[b]");
/// assert_eq!(literal.segments(), &[PathSegment::Key("a[b]".into())]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Create an empty path
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    /// Parse a path expression, keeping unrecognised bracket suffixes literal
    pub fn parse(expr: &str) -> Self {
        let segments = expr
            .split('.')
            .map(|raw| match parse_segment(raw) {
                SegmentParse::Parsed(segment) => segment,
                SegmentParse::Literal(_) => PathSegment::Key(raw.to_string()),
            })
            .collect();
        Path { segments }
    }

    /// Parse a path expression, rejecting empty segments and unrecognised
    /// bracket suffixes
    pub fn parse_strict(expr: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for (position, raw) in expr.split('.').enumerate() {
            if raw.is_empty() {
                return Err(Error::MalformedPath {
                    path: expr.to_string(),
                    reason: format!("empty segment at position {}", position),
                });
            }
            match parse_segment(raw) {
                SegmentParse::Parsed(segment) => segments.push(segment),
                SegmentParse::Literal(reason) => {
                    return Err(Error::MalformedPath {
                        path: expr.to_string(),
                        reason: format!("segment '{}': {}", raw, reason),
                    })
                }
            }
        }
        Ok(Path { segments })
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(name.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, name: impl Into<String>, index: usize) -> Self {
        self.segments.push(PathSegment::Index {
            name: name.into(),
            index,
        });
        self
    }

    /// Append a nested map key segment (builder pattern)
    pub fn map_key(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::MapKey {
            name: name.into(),
            key: key.into(),
        });
        self
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the terminal segment and the segments leading to it
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_last()
    }

    /// Check if this path is a single plain key
    pub fn is_simple_key(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].is_key()
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
