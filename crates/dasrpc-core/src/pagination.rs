//! Page-iteration engine for list endpoints.
//!
//! A [`Paginator`] is a forward-only, lazily evaluated sequence of pages.
//! Each pull performs one dispatch and yields its full result, failures
//! included. The sequence ends after a failed page or once the termination
//! policy says the collection is exhausted. Dropping the paginator (or the
//! stream built from it) is all a consumer has to do to stop early.
//!
//! Pages are fetched strictly one after another: whether page `n + 1`
//! exists depends on page `n`'s response.

use std::marker::PhantomData;

use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::dispatch::Dispatcher;
use crate::error::DasResult;

/// A response payload that carries one page of a collection.
pub trait Page {
    type Item;

    fn items(&self) -> &[Self::Item];

    fn into_items(self) -> Vec<Self::Item>;

    fn item_count(&self) -> usize {
        self.items().len()
    }

    /// Size of the whole collection, if the endpoint reports it.
    fn total(&self) -> Option<u64> {
        None
    }

    /// Page size echoed by the server.
    fn limit(&self) -> Option<u32> {
        None
    }

    /// Opaque continuation token, for cursor-paged endpoints.
    fn cursor(&self) -> Option<&str> {
        None
    }
}

/// How a list endpoint signals its last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Stop once `page * limit >= total`. Falls back to [`ShortPage`]
    /// when a response carries no `total`.
    ///
    /// [`ShortPage`]: Termination::ShortPage
    #[default]
    Total,
    /// Stop once a page holds fewer items than the limit.
    ShortPage,
}

/// Where a page sequence starts and how big its pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size. `None` lets the server pick (and echo) one.
    pub limit: Option<u32>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: None }
    }
}

impl PageRequest {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            page: 1,
            limit: Some(limit),
        }
    }

    pub fn starting_at(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Decide whether `page` (fetched as page number `page_number`) is the last.
///
/// The effective limit is the requested one if non-zero, else the one the
/// server echoed. With neither, or with an empty page, the sequence ends:
/// there is no safe way to tell whether more data exists.
pub fn is_last_page<P: Page>(
    page: &P,
    page_number: u32,
    requested_limit: Option<u32>,
    policy: Termination,
) -> bool {
    let effective = requested_limit
        .filter(|l| *l > 0)
        .or_else(|| page.limit().filter(|l| *l > 0));
    let Some(limit) = effective else {
        return true;
    };
    let count = page.item_count();
    if count == 0 {
        return true;
    }
    match (policy, page.total()) {
        (Termination::Total, Some(total)) => u64::from(page_number) * u64::from(limit) >= total,
        _ => count < limit as usize,
    }
}

/// Page-number driven sequence over one list method.
pub struct Paginator<P> {
    dispatcher: Dispatcher,
    method: String,
    params: Map<String, Value>,
    limit: Option<u32>,
    policy: Termination,
    start: u32,
    page: u32,
    done: bool,
    _page: PhantomData<fn() -> P>,
}

impl<P> Paginator<P>
where
    P: Page + DeserializeOwned,
{
    /// `params` are the endpoint's own parameters; `page` and `limit` are
    /// added to them on every request.
    pub fn new(
        dispatcher: Dispatcher,
        method: impl Into<String>,
        params: Map<String, Value>,
        request: PageRequest,
        policy: Termination,
    ) -> Self {
        let start = request.page.max(1);
        Self {
            dispatcher,
            method: method.into(),
            params,
            limit: request.limit,
            policy,
            start,
            page: start,
            done: false,
            _page: PhantomData,
        }
    }

    /// The page number the next pull will request.
    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Rewind to the starting page.
    pub fn restart(&mut self) {
        self.page = self.start;
        self.done = false;
    }

    /// Fetch the next page. Returns `None` once the sequence has ended.
    pub async fn next_page(&mut self) -> Option<DasResult<P>> {
        if self.done {
            return None;
        }

        let mut params = self.params.clone();
        params.insert("page".into(), Value::from(self.page));
        if let Some(limit) = self.limit {
            params.insert("limit".into(), Value::from(limit));
        }

        let result = self
            .dispatcher
            .dispatch::<P>(&self.method, Value::Object(params))
            .await;

        match &result {
            Err(e) => {
                tracing::debug!(method = %self.method, page = self.page, error = %e, "pagination stopped by error");
                self.done = true;
            }
            Ok(page) if is_last_page(page, self.page, self.limit, self.policy) => {
                tracing::debug!(method = %self.method, page = self.page, "last page reached");
                self.done = true;
            }
            Ok(_) => match self.page.checked_add(1) {
                Some(next) => self.page = next,
                None => self.done = true,
            },
        }

        Some(result)
    }

    /// Turn the paginator into a `Stream` of page results.
    pub fn into_stream(self) -> impl Stream<Item = DasResult<P>> {
        futures::stream::unfold(self, |mut pager| async move {
            pager.next_page().await.map(|r| (r, pager))
        })
    }

    /// Gather the items of every page, up to `max_pages` pages.
    ///
    /// Stops at the first failed page and returns its error.
    pub async fn collect_items(mut self, max_pages: Option<usize>) -> DasResult<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut fetched = 0usize;
        while max_pages.map(|m| fetched < m).unwrap_or(true) {
            match self.next_page().await {
                Some(Ok(page)) => items.extend(page.into_items()),
                Some(Err(e)) => return Err(e),
                None => break,
            }
            fetched += 1;
        }
        Ok(items)
    }
}

/// Cursor driven sequence: each response hands back the token for the next.
///
/// Ends when a page carries no cursor, carries the cursor that produced it,
/// or holds no items.
pub struct CursorPaginator<P> {
    dispatcher: Dispatcher,
    method: String,
    params: Map<String, Value>,
    limit: Option<u32>,
    cursor: Option<String>,
    done: bool,
    _page: PhantomData<fn() -> P>,
}

impl<P> CursorPaginator<P>
where
    P: Page + DeserializeOwned,
{
    pub fn new(
        dispatcher: Dispatcher,
        method: impl Into<String>,
        params: Map<String, Value>,
        limit: Option<u32>,
    ) -> Self {
        Self {
            dispatcher,
            method: method.into(),
            params,
            limit,
            cursor: None,
            done: false,
            _page: PhantomData,
        }
    }

    /// Resume from a cursor obtained earlier.
    pub fn resume_from(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// The cursor the next pull will send.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub async fn next_page(&mut self) -> Option<DasResult<P>> {
        if self.done {
            return None;
        }

        let mut params = self.params.clone();
        if let Some(limit) = self.limit {
            params.insert("limit".into(), Value::from(limit));
        }
        if let Some(cursor) = &self.cursor {
            params.insert("cursor".into(), Value::from(cursor.as_str()));
        }

        let result = self
            .dispatcher
            .dispatch::<P>(&self.method, Value::Object(params))
            .await;

        match &result {
            Err(_) => self.done = true,
            Ok(page) => match page.cursor() {
                Some(next)
                    if !next.is_empty()
                        && page.item_count() > 0
                        && self.cursor.as_deref() != Some(next) =>
                {
                    self.cursor = Some(next.to_string());
                }
                _ => self.done = true,
            },
        }

        Some(result)
    }

    pub fn into_stream(self) -> impl Stream<Item = DasResult<P>> {
        futures::stream::unfold(self, |mut pager| async move {
            pager.next_page().await.map(|r| (r, pager))
        })
    }
}
