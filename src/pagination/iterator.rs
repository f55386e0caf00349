//! Lazy iteration across pages of list results
//!
//! `ItemIterator` hands out items one at a time and fetches the next page
//! only when the current one is drained. At most one page is alive at a
//! time, and nothing is fetched once `max_results` items have been yielded.

use super::page::{ItemConverter, Page};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, Connection};
use crate::types::QueryParams;
use futures::stream::{self, Stream};
use tracing::debug;

/// Query parameter carrying the page token
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// Parameter name reserved for the result cap
pub const MAX_RESULTS_PARAM: &str = "maxResults";

/// Parameters the iterator manages itself
const RESERVED_PARAMS: [&str; 2] = [PAGE_TOKEN_PARAM, MAX_RESULTS_PARAM];

/// Options for a single list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Token of the page to start from
    pub page_token: Option<String>,
    /// Stop after yielding this many items
    pub max_results: Option<usize>,
    /// Extra query parameters sent with every page request
    pub extra_params: QueryParams,
}

impl ListOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a page token
    #[must_use]
    pub fn page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    /// Cap the number of yielded items
    #[must_use]
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Add an extra query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }
}

/// Where the iterator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// No page fetched yet
    NotStarted,
    /// A page is loaded
    InPage,
    /// No more items will be produced
    Exhausted,
}

/// Flattened, lazily fetched sequence of items across pages
pub struct ItemIterator<C: ItemConverter> {
    connection: Connection,
    path: String,
    items_key: String,
    converter: C,
    extra_params: QueryParams,
    page_token: Option<String>,
    max_results: Option<usize>,
    num_results: usize,
    page_number: usize,
    page: Option<Page<C::Item>>,
    exhausted: bool,
}

impl<C: ItemConverter> ItemIterator<C> {
    /// Create an iterator over `path`, reading items from `items_key`
    ///
    /// Fails if `extra_params` contains a parameter the iterator manages.
    pub fn new(
        connection: Connection,
        path: impl Into<String>,
        items_key: impl Into<String>,
        converter: C,
        options: ListOptions,
    ) -> Result<Self> {
        for reserved in RESERVED_PARAMS {
            if options.extra_params.contains_key(reserved) {
                return Err(Error::invalid_value(
                    "extra_params",
                    format!("'{reserved}' is managed by the iterator"),
                ));
            }
        }

        Ok(Self {
            connection,
            path: path.into(),
            items_key: items_key.into(),
            converter,
            extra_params: options.extra_params,
            page_token: options.page_token.filter(|t| !t.is_empty()),
            max_results: options.max_results,
            num_results: 0,
            page_number: 0,
            page: None,
            exhausted: false,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> IteratorState {
        if self.exhausted {
            IteratorState::Exhausted
        } else if self.page.is_none() {
            IteratorState::NotStarted
        } else {
            IteratorState::InPage
        }
    }

    /// Check if another page can be requested
    pub fn has_next_page(&self) -> bool {
        if self.exhausted || self.cap_reached() {
            return false;
        }

        match self.page {
            None => true,
            Some(_) => self.page_token.is_some(),
        }
    }

    /// Make sure a page with items is loaded, fetching one if needed
    ///
    /// Returns `false` once the sequence is exhausted. A page that still has
    /// items is kept and no request is made.
    pub async fn next_page(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        if self.page.as_ref().is_some_and(|p| !p.is_exhausted()) && !self.cap_reached() {
            return Ok(true);
        }

        if !self.has_next_page() {
            self.finish();
            return Ok(false);
        }

        let mut request = ApiRequest::get(self.path.as_str()).with_query(&self.extra_params);
        if let Some(ref token) = self.page_token {
            request = request.query(PAGE_TOKEN_PARAM, token.as_str());
        }

        let response = self.connection.api_request(request).await?;
        let page = Page::from_response(response, &self.items_key, &self.converter)?;

        self.page_number += 1;
        self.page_token = page.next_page_token().map(String::from);

        debug!(
            "Fetched page {} of {} ({} items, more: {})",
            self.page_number,
            self.path,
            page.num_items(),
            self.page_token.is_some()
        );

        self.page = Some(page);
        Ok(true)
    }

    /// Next item, fetching pages as needed; `None` when done
    pub async fn next(&mut self) -> Result<Option<C::Item>> {
        loop {
            if self.cap_reached() {
                self.finish();
                return Ok(None);
            }

            if let Some(item) = self.page.as_mut().and_then(Page::next_item) {
                self.num_results += 1;
                return Ok(Some(item));
            }

            if !self.next_page().await? {
                return Ok(None);
            }
        }
    }

    /// Drain the iterator into a vector
    pub async fn collect_all(mut self) -> Result<Vec<C::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Turn the iterator into a stream of items
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<C::Item>> {
        stream::try_unfold(self, |mut iter| async move {
            Ok::<_, Error>(iter.next().await?.map(|item| (item, iter)))
        })
    }

    /// The currently loaded page
    pub fn page(&self) -> Option<&Page<C::Item>> {
        self.page.as_ref()
    }

    /// Number of pages fetched so far
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Number of items yielded so far
    pub fn num_results(&self) -> usize {
        self.num_results
    }

    /// Configured result cap
    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Token that will be sent with the next page request
    pub fn next_page_token(&self) -> Option<&str> {
        self.page_token.as_deref()
    }

    /// Resource path being listed
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extra query parameters sent with every page request
    pub fn extra_params(&self) -> &QueryParams {
        &self.extra_params
    }

    fn cap_reached(&self) -> bool {
        self.max_results.is_some_and(|max| self.num_results >= max)
    }

    fn finish(&mut self) {
        self.page = None;
        self.exhausted = true;
    }
}

impl<C: ItemConverter> std::fmt::Debug for ItemIterator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemIterator")
            .field("path", &self.path)
            .field("items_key", &self.items_key)
            .field("extra_params", &self.extra_params)
            .field("page_token", &self.page_token)
            .field("max_results", &self.max_results)
            .field("num_results", &self.num_results)
            .field("page_number", &self.page_number)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
