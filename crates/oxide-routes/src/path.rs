//! Path pattern compilation and matching.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{PatternErrorKind, Result, RouterError};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)\}$").expect("Invalid placeholder regex")
    })
}

/// Splits a normalized path into its segments.
///
/// One leading `/` is implied. The root (`""` or `"/"`) has no segments,
/// and empty segments between slashes are kept so that they can never
/// satisfy a placeholder.
pub fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal segment, compared case-sensitively.
    Literal(String),
    /// A named placeholder (e.g. `{item}`) capturing one non-empty segment.
    Param(String),
}

/// A compiled path pattern.
///
/// Every segment matches exactly one path segment, so a pattern only
/// ever matches paths with the same number of segments.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/` - The root
    /// - `/docs` - Literal path
    /// - `/docs/{item}` - Path with a placeholder
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] if the pattern is empty,
    /// has a segment that opens or closes a brace without being a valid
    /// `{identifier}`, or repeats a placeholder name.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routes::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/posts/{id}/comments/{comment_id}").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456").unwrap();
    /// assert_eq!(params.get("id").map(String::as_str), Some("123"));
    /// assert_eq!(params.get("comment_id").map(String::as_str), Some("456"));
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(RouterError::invalid_pattern(pattern, PatternErrorKind::Empty));
        }

        let mut segments = Vec::new();
        let mut seen = HashSet::new();

        for part in split_path(pattern) {
            if part.starts_with('{') || part.ends_with('}') {
                let name = placeholder_regex()
                    .captures(part)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .ok_or_else(|| {
                        RouterError::invalid_pattern(
                            pattern,
                            PatternErrorKind::MalformedPlaceholder(part.to_string()),
                        )
                    })?;

                if !seen.insert(name.clone()) {
                    return Err(RouterError::invalid_pattern(
                        pattern,
                        PatternErrorKind::DuplicatePlaceholder(name),
                    ));
                }
                segments.push(PathSegment::Param(name));
            } else {
                segments.push(PathSegment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Aligns already-split path segments against this pattern.
    ///
    /// Returns the captured placeholder values in pattern order, or `None`
    /// as soon as one segment disagrees.
    pub fn match_segments(&self, path: &[&str]) -> Option<Vec<(String, String)>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut captures = Vec::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                PathSegment::Literal(lit) => {
                    if lit != value {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    captures.push((name.clone(), (*value).to_string()));
                }
            }
        }

        Some(captures)
    }

    /// Matches a path string against this pattern.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        self.match_segments(&split_path(path))
            .map(|captures| captures.into_iter().collect())
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of path segments this pattern matches.
    pub fn arity(&self) -> usize {
        self.segments.len()
    }

    /// Returns the placeholder names in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Param(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }

    /// Generates a path from placeholder values.
    ///
    /// Returns `None` if a value is missing, empty or contains a `/`,
    /// since such a path would not match this pattern again.
    pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut path = String::new();

        for segment in &self.segments {
            path.push('/');
            match segment {
                PathSegment::Literal(s) => path.push_str(s),
                PathSegment::Param(name) => {
                    let value = params.get(name)?;
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    path.push_str(value);
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        Some(path)
    }
}
