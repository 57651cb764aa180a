//! Cursor pagination over list endpoints.
//!
//! A `Paginator` fetches the first page of a collection and keeps following
//! `next_page` until the server stops advertising one, concatenating the
//! items of every page in order. The whole collection is held in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use url::Url;

use crate::client::ZendeskClient;
use crate::error::ZenklyError;
use crate::models::Page;

/// Default bound on the number of pages followed for one collection.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Observer for long-running collection work.
///
/// `report` is called with the number of items handled so far and the
/// expected total.
pub trait Progress: Send + Sync {
    /// Records progress.
    fn report(&self, done: u64, total: u64);

    /// Called once when the work is over.
    fn finish(&self) {}
}

impl Progress for indicatif::ProgressBar {
    fn report(&self, done: u64, total: u64) {
        self.set_length(total);
        self.set_position(done);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}

/// A `Progress` that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn report(&self, _done: u64, _total: u64) {}
}

/// A `Progress` that keeps every report, for inspection.
#[derive(Debug, Default)]
pub struct RecordedProgress {
    reports: Mutex<Vec<(u64, u64)>>,
    finished: AtomicBool,
}

impl RecordedProgress {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(done, total)` pairs reported so far.
    pub fn reports(&self) -> Vec<(u64, u64)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// Returns true once `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Progress for RecordedProgress {
    fn report(&self, done: u64, total: u64) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((done, total));
        }
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

/// Walks a paginated list endpoint to completion.
#[derive(Clone)]
pub struct Paginator<'a> {
    client: &'a ZendeskClient,
    max_pages: usize,
}

impl<'a> Paginator<'a> {
    /// Creates a paginator with the default page bound.
    pub fn new(client: &'a ZendeskClient) -> Self {
        Self {
            client,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Sets the maximum number of pages to follow.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetches every page of the collection stored under `key` at `path`.
    ///
    /// `query` is sent with the first request and carried onto every
    /// `next_page` URL that does not already include it.
    ///
    /// # Errors
    ///
    /// Any request failure aborts the whole listing. If the server still
    /// advertises a next page after `max_pages` pages, fails with
    /// `ZenklyError::PageLimitExceeded`.
    pub async fn collect_all(
        &self,
        key: &str,
        path: &str,
        query: &[(String, String)],
        progress: &dyn Progress,
    ) -> Result<Vec<Value>, ZenklyError> {
        let result = self.walk(key, path, query, progress).await;
        progress.finish();
        result
    }

    async fn walk(
        &self,
        key: &str,
        path: &str,
        query: &[(String, String)],
        progress: &dyn Progress,
    ) -> Result<Vec<Value>, ZenklyError> {
        let mut url = self.client.endpoint(path, query)?;
        let mut items: Vec<Value> = Vec::new();
        let mut pages = 0usize;

        loop {
            let body = self.client.get_url(&url).await?;
            let page = Page::from_response(body, key)?;
            pages += 1;

            items.extend(page.items);
            let fetched = items.len() as u64;
            // `count` is advisory; never report a total below what we already hold.
            let total = page.count.unwrap_or(0).max(fetched);
            progress.report(fetched, total);

            tracing::debug!(key, page = pages, fetched, total, "Fetched page");

            let Some(next_page) = page.next_page else {
                break;
            };

            if pages >= self.max_pages {
                return Err(ZenklyError::PageLimitExceeded {
                    max_pages: self.max_pages,
                    url: next_page,
                });
            }

            url = Self::next_url(&url, &next_page, query)?;
        }

        tracing::info!(key, pages, count = items.len(), "Collection fetched");

        Ok(items)
    }

    /// Resolves a `next_page` value against the current URL and carries over
    /// any original query parameter it lacks.
    fn next_url(
        current: &Url,
        next_page: &str,
        query: &[(String, String)],
    ) -> Result<Url, ZenklyError> {
        let mut next = current.join(next_page).map_err(|e| {
            ZenklyError::response_format(format!("invalid next_page URL: {e}"), next_page)
        })?;

        let missing: Vec<(String, String)> = query
            .iter()
            .filter(|(name, _)| !next.query_pairs().any(|(existing, _)| existing == *name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            next.query_pairs_mut().extend_pairs(&missing);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_next_url_keeps_server_query() {
        let current =
            Url::parse("https://acme.zendesk.com/api/v2/triggers.json?active=true").unwrap();
        let next = Paginator::next_url(
            &current,
            "https://acme.zendesk.com/api/v2/triggers.json?active=true&page=2",
            &query(&[("active", "true")]),
        )
        .unwrap();
        assert_eq!(
            next.as_str(),
            "https://acme.zendesk.com/api/v2/triggers.json?active=true&page=2"
        );
    }

    #[test]
    fn test_next_url_adds_missing_query() {
        let current = Url::parse("https://acme.zendesk.com/api/v2/views.json?group_id=7").unwrap();
        let next = Paginator::next_url(
            &current,
            "https://acme.zendesk.com/api/v2/views.json?page=2",
            &query(&[("group_id", "7")]),
        )
        .unwrap();
        assert_eq!(
            next.as_str(),
            "https://acme.zendesk.com/api/v2/views.json?page=2&group_id=7"
        );
    }

    #[test]
    fn test_next_url_resolves_relative_cursor() {
        let current = Url::parse("https://acme.zendesk.com/api/v2/macros.json").unwrap();
        let next = Paginator::next_url(&current, "/api/v2/macros.json?page=3", &[]).unwrap();
        assert_eq!(next.as_str(), "https://acme.zendesk.com/api/v2/macros.json?page=3");
    }

    #[test]
    fn test_recorded_progress() {
        let progress = RecordedProgress::new();
        progress.report(2, 5);
        progress.report(5, 5);
        assert_eq!(progress.reports(), vec![(2, 5), (5, 5)]);
    }
}
