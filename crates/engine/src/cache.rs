//! Result Cache
//!
//! Per-QuerySet store of mapped items keyed by provider position, plus what
//! has been learned about the result set: its total once known, and for
//! cursor-paged providers the continuation point.
//!
//! ## Invariants
//!
//! - Only complete, fully mapped pages are absorbed. A page whose fetch
//!   failed or was canceled never reaches the cache.
//! - Items already cached are never replaced; absorbing the same page twice
//!   is a no-op.
//! - Once fixed by an exhausted page, the total only ever shrinks.

use patent_client_core::{Page, Record};
use std::collections::BTreeMap;

/// One mapped item: the normalized record and the typed model built from it
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<M> {
    /// Field Mapper output
    pub record: Record,
    /// Typed record
    pub model: M,
}

/// Mapped items by provider position
#[derive(Debug)]
pub struct ResultCache<M> {
    items: BTreeMap<usize, Mapped<M>>,
    total: Option<usize>,
    frontier: usize,
    cursor: Option<String>,
    pages: usize,
}

impl<M> Default for ResultCache<M> {
    fn default() -> Self {
        ResultCache {
            items: BTreeMap::new(),
            total: None,
            frontier: 0,
            cursor: None,
            pages: 0,
        }
    }
}

impl<M> ResultCache<M> {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Item at a provider position, if cached
    pub fn get(&self, position: usize) -> Option<&Mapped<M>> {
        self.items.get(&position)
    }

    /// True if the provider position is cached
    pub fn contains(&self, position: usize) -> bool {
        self.items.contains_key(&position)
    }

    /// Provider-side total, once known
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Number of cached items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages absorbed so far
    pub fn pages_absorbed(&self) -> usize {
        self.pages
    }

    /// Provider position where the next cursor page starts
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    /// Continuation token for the page at [`frontier`](Self::frontier)
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Lowest provider position `>= from` that is not cached
    pub fn first_missing(&self, from: usize) -> usize {
        let mut position = from;
        for (&cached, _) in self.items.range(from..) {
            if cached != position {
                break;
            }
            position += 1;
        }
        position
    }

    /// Store a mapped page
    ///
    /// `exhausted_at` is the provider position at which the result set is
    /// known to end, when this page proved it; a smaller reported total
    /// wins. Otherwise the page's reported total is adopted if no total is
    /// known yet.
    pub fn absorb(&mut self, page: Page<Mapped<M>>, exhausted_at: Option<usize>) {
        let start = page.start;
        let end = page.end();
        let count = page.items.len();
        let reported = page.total;

        for (i, item) in page.items.into_iter().enumerate() {
            self.items.entry(start + i).or_insert(item);
        }

        if start == self.frontier {
            self.frontier = end;
            self.cursor = page.cursor;
        }

        match exhausted_at {
            Some(at) => {
                let at = reported.map_or(at, |t| t.min(at));
                self.total = Some(self.total.map_or(at, |known| known.min(at)));
            }
            None => {
                if self.total.is_none() {
                    self.total = reported;
                }
            }
        }
        self.pages += 1;

        tracing::debug!(
            target: "patent_client::cache",
            start,
            items = count,
            total = ?self.total,
            cached = self.items.len(),
            "absorbed page"
        );
    }
}
