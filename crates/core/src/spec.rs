//! Query specifications
//!
//! A [`QuerySpec`] is an immutable description of one logical query:
//! - record type tag
//! - filters: field → values (OR within a field, AND across fields)
//! - sort keys with direction
//! - offset/limit bounds
//!
//! Every chaining method returns a new specification with the delta
//! applied; the receiver is never modified. Two specifications are equal
//! iff all components compare equal.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// FilterValue / Criterion
// ============================================================================

/// A single filter operand
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterValue {
    /// Text operand
    Str(String),
    /// Integer operand
    Int(i64),
    /// Boolean operand
    Bool(bool),
    /// Date operand
    Date(NaiveDate),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Str(s) => write!(f, "{}", s),
            FilterValue::Int(n) => write!(f, "{}", n),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        FilterValue::Str(s.clone())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Int(n)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Int(i64::from(n))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

/// The accepted values for one filter field (logical OR)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Criterion(Vec<FilterValue>);

impl Criterion {
    /// Criterion accepting any of `values`
    pub fn any<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Criterion(values.into_iter().map(Into::into).collect())
    }

    /// The accepted values, in the order given
    pub fn values(&self) -> &[FilterValue] {
        &self.0
    }
}

macro_rules! criterion_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Criterion {
                fn from(value: $t) -> Self {
                    Criterion(vec![value.into()])
                }
            }
        )*
    };
}

criterion_from_scalar!(&str, String, &String, i64, u32, bool, NaiveDate, FilterValue);

impl<T: Into<FilterValue>> From<Vec<T>> for Criterion {
    fn from(values: Vec<T>) -> Self {
        Criterion::any(values)
    }
}

impl<T: Into<FilterValue>, const N: usize> From<[T; N]> for Criterion {
    fn from(values: [T; N]) -> Self {
        Criterion::any(values)
    }
}

// ============================================================================
// SortKey
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// One sort key
///
/// Parsed from strings with a leading `-` meaning descending:
///
/// ```
/// use patent_client_core::{Direction, SortKey};
///
/// let key = SortKey::from("-filing_date");
/// assert_eq!(key.field, "filing_date");
/// assert_eq!(key.direction, Direction::Descending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    /// Normalized field name
    pub field: String,
    /// Direction
    pub direction: Direction,
}

impl SortKey {
    /// Ascending key on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Descending key on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(field) => SortKey::desc(field),
            None => SortKey::asc(s.strip_prefix('+').unwrap_or(s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}

// ============================================================================
// QuerySpec
// ============================================================================

/// Immutable description of filter/sort/offset/limit and the optional
/// field projection
///
/// # Examples
///
/// ```
/// use patent_client_core::QuerySpec;
///
/// let base = QuerySpec::new("UsApplication");
/// let q = base.filter("appl_id", "16123456").limit(10);
///
/// assert_eq!(base, QuerySpec::new("UsApplication"));
/// assert_eq!(q.limit_bound(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    record_type: &'static str,
    filters: BTreeMap<String, Vec<FilterValue>>,
    sort: Vec<SortKey>,
    offset: usize,
    limit: Option<usize>,
    fields: Vec<String>,
}

impl QuerySpec {
    /// Unfiltered specification for a record type
    pub fn new(record_type: &'static str) -> Self {
        QuerySpec {
            record_type,
            filters: BTreeMap::new(),
            sort: Vec::new(),
            offset: 0,
            limit: None,
            fields: Vec::new(),
        }
    }

    /// Record type tag
    pub fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// Filters by field name
    pub fn filters(&self) -> &BTreeMap<String, Vec<FilterValue>> {
        &self.filters
    }

    /// Values for one filter field, if filtered
    pub fn filter_values(&self, field: &str) -> Option<&[FilterValue]> {
        self.filters.get(field).map(Vec::as_slice)
    }

    /// Sort keys, highest precedence first
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    /// Number of leading results skipped
    pub fn offset_bound(&self) -> usize {
        self.offset
    }

    /// Maximum number of results, if bounded
    pub fn limit_bound(&self) -> Option<usize> {
        self.limit
    }

    /// Projected field names; empty means every declared field
    pub fn projection(&self) -> &[String] {
        &self.fields
    }

    /// Add a filter; a field already filtered has its values replaced
    pub fn filter(&self, field: impl Into<String>, criterion: impl Into<Criterion>) -> Self {
        let mut next = self.clone();
        next.filters.insert(field.into(), criterion.into().0);
        next
    }

    /// Add several filters at once (same replacement rule as [`filter`])
    ///
    /// [`filter`]: QuerySpec::filter
    pub fn filter_many<I, K, C>(&self, criteria: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion>,
    {
        let mut next = self.clone();
        for (field, criterion) in criteria {
            next.filters.insert(field.into(), criterion.into().0);
        }
        next
    }

    /// Replace the sort keys
    pub fn sort<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        let mut next = self.clone();
        next.sort = keys.into_iter().map(Into::into).collect();
        next
    }

    /// Skip `n` further results; an existing limit shrinks accordingly
    pub fn offset(&self, n: usize) -> Self {
        let mut next = self.clone();
        next.offset = self.offset.saturating_add(n);
        next.limit = self.limit.map(|l| l.saturating_sub(n));
        next
    }

    /// Bound the number of results (never widens an existing bound)
    pub fn limit(&self, n: usize) -> Self {
        let mut next = self.clone();
        next.limit = Some(self.limit.map_or(n, |l| l.min(n)));
        next
    }

    /// Replace the field projection; an empty list selects every field
    pub fn project<I, F>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let mut next = self.clone();
        next.fields = fields.into_iter().map(Into::into).collect();
        next
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.record_type)?;
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|(k, vs)| {
                let rendered: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                if rendered.len() == 1 {
                    format!("{}={}", k, rendered[0])
                } else {
                    format!("{}=[{}]", k, rendered.join("|"))
                }
            })
            .collect();
        if !self.sort.is_empty() {
            let keys: Vec<String> = self.sort.iter().map(|k| k.to_string()).collect();
            parts.push(format!("sort={}", keys.join(",")));
        }
        if self.offset > 0 {
            parts.push(format!("offset={}", self.offset));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }
        if !self.fields.is_empty() {
            parts.push(format!("fields={}", self.fields.join(",")));
        }
        write!(f, "{})", parts.join(", "))
    }
}
