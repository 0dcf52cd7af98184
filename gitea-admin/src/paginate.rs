//! Page-based collection reads
//!
//! Gitea list endpoints take `limit` and `page` (1-based) query parameters.
//! [`Paginator`] requests successive pages and stops at the first page that
//! holds fewer items than requested. The server is trusted not to return a
//! short page followed by more data; this is not verified.
//!
//! Gitea caps `limit` at its `MAX_RESPONSE_ITEMS` setting (50 by default). A
//! larger page size gets a full page back that looks short, so the read stops
//! after the first page. Keep the page size at or below the server's cap.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::gateway::{Gateway, GatewayResult};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Default `MAX_RESPONSE_ITEMS` of a Gitea server
pub const SERVER_MAX_PAGE_SIZE: usize = 50;

/// Whether a page size is above what a stock Gitea server will return
pub fn exceeds_server_limit(page_size: usize) -> bool {
    page_size > SERVER_MAX_PAGE_SIZE
}

/// Lazy, non-restartable reader over a paginated endpoint
pub struct Paginator<'a, T> {
    gateway: &'a dyn Gateway,
    endpoint: String,
    query: Vec<(&'static str, String)>,
    page_size: usize,
    next_page: u32,
    exhausted: bool,
    _item: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    /// Create a paginator; a page size of zero is treated as one
    pub fn new(gateway: &'a dyn Gateway, endpoint: impl Into<String>, page_size: usize) -> Self {
        Self {
            gateway,
            endpoint: endpoint.into(),
            query: Vec::new(),
            page_size: page_size.max(1),
            next_page: 1,
            exhausted: false,
            _item: PhantomData,
        }
    }

    /// Add a query parameter sent with every page request
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Number of page requests issued so far
    pub fn pages_fetched(&self) -> u32 {
        self.next_page - 1
    }

    /// Fetch the next page, or `None` once the collection is exhausted
    ///
    /// A transport failure or a non-200 status ends the sequence with an
    /// error.
    pub async fn next_page(&mut self) -> GatewayResult<Option<Vec<T>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut query = self.query.clone();
        query.push(("limit", self.page_size.to_string()));
        query.push(("page", self.next_page.to_string()));

        let result = self.gateway.get(&self.endpoint, &query).await;
        self.next_page += 1;

        let items: Vec<T> = match result.and_then(|r| r.expect_json(&self.endpoint, 200)) {
            Ok(items) => items,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };

        debug!(
            endpoint = %self.endpoint,
            page = self.next_page - 1,
            items = items.len(),
            "fetched page"
        );

        if items.len() < self.page_size {
            self.exhausted = true;
        }
        Ok(Some(items))
    }

    /// Concatenate all pages in server order
    ///
    /// Pages collected before a failing page are discarded.
    pub async fn collect_all(mut self) -> GatewayResult<Vec<T>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }
}
