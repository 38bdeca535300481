//! Pagination utilities for Easybill list endpoints.
//!
//! Every list endpoint answers with an envelope of the form
//! `{"items": [...], "pages": N}`. [`drain`] walks such an endpoint page by
//! page until it is exhausted.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::payload::{self, Payload};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// A page of results from the Easybill API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Total number of pages reported by the server.
    pub total_pages: u32,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_pages: u32) -> Self {
        Self {
            has_more: page < total_pages,
            items,
            page,
            limit,
            total_pages,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_more: self.has_more,
        }
    }

    /// Map the items with a fallible function, failing on the first error.
    pub fn try_map<U, F>(self, f: F) -> Result<Page<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_>>()?,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_more: self.has_more,
        })
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Raw list response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    #[serde(default)]
    pub items: Vec<Payload>,
    #[serde(default)]
    pub pages: Option<Value>,
}

impl ListEnvelope {
    /// Convert the envelope into a page of raw payloads.
    ///
    /// A missing or unusable `pages` value counts as a single page.
    pub fn into_page(self, page: u32, limit: u32) -> Page<Payload> {
        let total_pages = self
            .pages
            .as_ref()
            .and_then(payload::coerce_int)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        Page::new(self.items, page, limit, total_pages)
    }
}

/// Fetch every page of a listing and concatenate the items in order.
///
/// `fetch_page` is called with page numbers 1, 2, ... and stops when a page
/// comes back empty or the next page number would exceed the last reported
/// `total_pages`. The first error aborts the drain and nothing collected so
/// far is returned.
pub async fn drain<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all_items = Vec::new();
    let mut page = 1;

    loop {
        let result = fetch_page(page).await?;
        if result.items.is_empty() {
            break;
        }

        tracing::debug!(
            page,
            items = result.items.len(),
            total_pages = result.total_pages,
            "Fetched page"
        );
        all_items.extend(result.items);

        page += 1;
        if page > result.total_pages {
            break;
        }
    }

    Ok(all_items)
}
