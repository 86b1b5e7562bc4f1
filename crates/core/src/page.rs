//! Fetched pages
//!
//! A [`PageBody`] is what a provider parses out of one response: raw items
//! plus whatever the provider reports about the remainder of the result
//! set. The Result Cache stores mapped items positioned by the provider's
//! own index, so a page also carries its starting position.

use serde_json::Value;

/// Provider-parsed content of one response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageBody {
    /// Raw items in provider order
    pub items: Vec<Value>,
    /// Total result count, if the provider reports it
    pub total: Option<usize>,
    /// Provider indicates more items exist past this page
    pub has_more: bool,
    /// Continuation token for cursor-paged providers
    pub cursor: Option<String>,
}

impl PageBody {
    /// Body holding `items` with nothing further known
    pub fn new(items: Vec<Value>) -> Self {
        PageBody {
            items,
            ..Default::default()
        }
    }

    /// Set the reported total
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Mark that more items follow
    pub fn with_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    /// Set the continuation cursor
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// One contiguous slice of the provider's result set
///
/// `start` is the provider position of the first item.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Provider position of `items[0]`
    pub start: usize,
    /// Items in provider order
    pub items: Vec<T>,
    /// Total result count, if reported
    pub total: Option<usize>,
    /// More items exist after this page
    pub has_more: bool,
    /// Cursor for the page following this one
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Provider position one past the last item
    pub fn end(&self) -> usize {
        self.start + self.items.len()
    }

    /// True if the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert each item, keeping page metadata; the first error wins
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            start: self.start,
            items,
            total: self.total,
            has_more: self.has_more,
            cursor: self.cursor,
        })
    }
}

impl Page<Value> {
    /// Place a parsed body at provider position `start`
    pub fn from_body(start: usize, body: PageBody) -> Self {
        Page {
            start,
            items: body.items,
            total: body.total,
            has_more: body.has_more,
            cursor: body.cursor,
        }
    }
}
