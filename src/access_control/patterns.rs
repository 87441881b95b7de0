//! Path pattern matching for access control
//!
//! A pattern is a `/`-delimited list of segments. Every segment either
//! matches one exact path segment or is a wildcard slot matching any single
//! segment. There is no variable-length matching: a pattern only ever
//! matches paths with the same number of segments.

use std::fmt;

/// Reserved segment tokens that match any single path segment
pub const WILDCARD_TOKENS: &[&str] = &["*", ":param", ":user"];

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches only a byte-equal path segment
    Literal(String),
    /// Matches any path segment; produced by empty segments and wildcard tokens
    Wildcard,
}

impl Segment {
    fn parse(token: &str) -> Self {
        if token.is_empty() || WILDCARD_TOKENS.contains(&token) {
            Segment::Wildcard
        } else {
            Segment::Literal(token.to_string())
        }
    }

    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::Wildcard => true,
            Segment::Literal(literal) => literal == part,
        }
    }
}

/// Parsed path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = source.split('/').map(Segment::parse).collect();
        Self { source, segments }
    }

    /// Check if a request path matches this pattern
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/');
        for segment in &self.segments {
            match parts.next() {
                Some(part) if segment.matches(part) => {}
                _ => return false,
            }
        }
        // Path has more segments than the pattern
        parts.next().is_none()
    }

    /// The pattern as it was registered
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for PathPattern {
    fn from(source: &str) -> Self {
        PathPattern::new(source)
    }
}
