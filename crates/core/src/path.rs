//! Exact paths into nested payloads
//!
//! A [`FieldPath`] is a sequence of key and index segments. Resolution is
//! case-preserving and exact: there is no fuzzy matching, no case folding
//! and no wildcard. Missing intermediate levels resolve to `None`, never to
//! an error.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object property | `cityName` |
//! | `[n]` | Array index | `[0]` |
//! | `a.b` | Nested property | `applicationMetaData.filingDate` |
//! | `a[n].b` | Property, index, property | `patentBag[0].continuityBag` |
//! | (empty) | Root | `` |
//!
//! Keys may contain any character other than `.`, `[` and `]`, so wire
//! names such as `ops:world-patent-data`, `@family-id`, `$` and
//! `class/subclass` are valid segments.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
}

/// Error type for writes through a path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Existing container has the wrong type for the segment
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Container type the segment needs
        expected: &'static str,
        /// Container type actually present
        found: &'static str,
    },
    /// Index past the end of an array (appending at `len` is allowed)
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path into a nested payload
///
/// # Examples
///
/// ```
/// use patent_client_core::path::FieldPath;
///
/// let parent = FieldPath::root()
///     .key("patentBag")
///     .index(0)
///     .key("continuityBag")
///     .key("parentContinuityBag");
///
/// let parsed: FieldPath = "patentBag[0].continuityBag.parentContinuityBag".parse().unwrap();
/// assert_eq!(parsed, parent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        FieldPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        FieldPath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Convert to the textual form accepted by [`FromStr`]
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathSegment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Supported syntax:
    /// - `foo` - object key
    /// - `[0]` - array index
    /// - `foo.bar` - nested keys
    /// - `foo[0].bar` - mixed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(FieldPath::root());
        }

        let mut segments = Vec::new();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    if i >= chars.len() || chars[i] == '.' {
                        return Err(PathParseError::EmptyKey(i));
                    }
                }
                '[' => {
                    let start = i;
                    i += 1;
                    let idx_start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    if i >= chars.len() {
                        return Err(PathParseError::UnclosedBracket(start));
                    }
                    let idx_str: String = chars[idx_start..i].iter().collect();
                    let idx = idx_str
                        .parse::<usize>()
                        .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;
                    segments.push(PathSegment::Index(idx));
                    i += 1;
                }
                _ => {
                    let key_start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' && chars[i] != ']'
                    {
                        i += 1;
                    }
                    if i < chars.len() && chars[i] == ']' {
                        return Err(PathParseError::UnclosedBracket(i));
                    }
                    let key: String = chars[key_start..i].iter().collect();
                    segments.push(PathSegment::Key(key));
                }
            }
        }

        Ok(FieldPath { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

// =============================================================================
// Path Operations
// =============================================================================

/// Get value at path within a payload
///
/// Returns `None` when any level is missing or has the wrong container
/// type for its segment.
///
/// ```
/// use patent_client_core::path::{get_at_path, FieldPath};
/// use serde_json::json;
///
/// let payload = json!({"customerNumber": {"patronIdentifier": 12345}});
/// let path: FieldPath = "customerNumber.patronIdentifier".parse().unwrap();
/// assert_eq!(get_at_path(&payload, &path), Some(&json!(12345)));
///
/// let missing: FieldPath = "customerNumber.powerOfAttorneyAddressBag[0]".parse().unwrap();
/// assert_eq!(get_at_path(&payload, &missing), None);
/// ```
pub fn get_at_path<'a>(value: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(obj)) => obj.get(key)?,
            (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set value at path within a payload
///
/// Creates intermediate objects and arrays as needed. The type of a new
/// intermediate container is chosen by the segment that follows it. An
/// index equal to the current array length appends.
pub fn set_at_path(root: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let segments = path.segments();
    if segments.is_empty() {
        *root = value;
        return Ok(());
    }

    let (parents, last) = segments.split_at(segments.len() - 1);
    let mut current = root;

    for (i, segment) in parents.iter().enumerate() {
        let next = &segments[i + 1];
        current = descend_or_create(current, segment, next)?;
    }

    match &last[0] {
        PathSegment::Key(key) => match current {
            Value::Object(obj) => {
                obj.insert(key.clone(), value);
                Ok(())
            }
            other => Err(PathError::TypeMismatch {
                expected: "object",
                found: value_type_name(other),
            }),
        },
        PathSegment::Index(idx) => match current {
            Value::Array(arr) if *idx < arr.len() => {
                arr[*idx] = value;
                Ok(())
            }
            Value::Array(arr) if *idx == arr.len() => {
                arr.push(value);
                Ok(())
            }
            Value::Array(arr) => Err(PathError::IndexOutOfBounds {
                index: *idx,
                len: arr.len(),
            }),
            other => Err(PathError::TypeMismatch {
                expected: "array",
                found: value_type_name(other),
            }),
        },
    }
}

fn empty_container_for(next: &PathSegment) -> Value {
    match next {
        PathSegment::Key(_) => Value::Object(serde_json::Map::new()),
        PathSegment::Index(_) => Value::Array(Vec::new()),
    }
}

fn descend_or_create<'a>(
    current: &'a mut Value,
    segment: &PathSegment,
    next: &PathSegment,
) -> Result<&'a mut Value, PathError> {
    match (segment, current) {
        (PathSegment::Key(key), Value::Object(obj)) => Ok(obj
            .entry(key.clone())
            .or_insert_with(|| empty_container_for(next))),
        (PathSegment::Index(idx), Value::Array(arr)) => {
            if *idx == arr.len() {
                arr.push(empty_container_for(next));
            }
            let len = arr.len();
            arr.get_mut(*idx)
                .ok_or(PathError::IndexOutOfBounds { index: *idx, len })
        }
        (PathSegment::Key(_), other) => Err(PathError::TypeMismatch {
            expected: "object",
            found: value_type_name(other),
        }),
        (PathSegment::Index(_), other) => Err(PathError::TypeMismatch {
            expected: "array",
            found: value_type_name(other),
        }),
    }
}

/// Helper to get type name for error messages
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
