// src/services/fetcher.rs

//! Page fetcher service.
//!
//! Retrieves page bodies while keeping a crawl inside one domain, fetching
//! each URL at most once, and refusing URLs already being fetched.

use std::collections::HashSet;

use reqwest::Client;
use thiserror::Error;

use crate::error::{AppError, Result};
use crate::utils::{get_domain, http::fetch_text, is_same_domain};

/// Why a URL produced no body.
#[derive(Debug, Error)]
pub enum FetchRejection {
    #[error("outside allowed domain {domain}")]
    DomainBoundary { domain: String },

    #[error("already visited")]
    AlreadyVisited,

    #[error("circular reference")]
    Circular,

    #[error("transport failure: {0}")]
    Transport(AppError),
}

/// Rejections observed during a run, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    pub off_domain: usize,
    pub duplicates: usize,
    pub circular: usize,
    pub transport: usize,
}

/// URLs currently being fetched, innermost last.
#[derive(Debug, Default)]
pub struct PathStack {
    urls: Vec<String>,
}

impl PathStack {
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Push `url` unless it is already on the stack.
    ///
    /// The returned guard pops the entry when dropped.
    pub fn enter(&mut self, url: &str) -> Option<PathGuard<'_>> {
        if self.contains(url) {
            return None;
        }
        self.urls.push(url.to_string());
        Some(PathGuard { stack: self })
    }
}

/// Scope of one entry on a [`PathStack`].
#[derive(Debug)]
pub struct PathGuard<'a> {
    stack: &'a mut PathStack,
}

impl PathGuard<'_> {
    /// Enter a nested URL while this one is still active.
    pub fn enter(&mut self, url: &str) -> Option<PathGuard<'_>> {
        self.stack.enter(url)
    }

    pub fn stack(&self) -> &PathStack {
        self.stack
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.stack.urls.pop();
    }
}

/// Fetches pages for a single crawl run.
pub struct PageFetcher {
    client: Client,
    domain: String,
    visited: HashSet<String>,
    path: PathStack,
    rejections: RejectionCounts,
}

impl PageFetcher {
    /// Create a fetcher scoped to the host of `base_url`.
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let domain = get_domain(base_url)
            .ok_or_else(|| AppError::config(format!("Base URL has no host: {base_url}")))?;

        Ok(Self {
            client,
            domain,
            visited: HashSet::new(),
            path: PathStack::default(),
            rejections: RejectionCounts::default(),
        })
    }

    /// Fetch a page body, or `None` when the URL is rejected or fails.
    pub async fn fetch(&mut self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(rejection) => {
                self.record(url, &rejection);
                None
            }
        }
    }

    /// Fetch a page body, reporting why nothing was returned.
    pub async fn try_fetch(&mut self, url: &str) -> std::result::Result<String, FetchRejection> {
        if !is_same_domain(&self.domain, url) {
            return Err(FetchRejection::DomainBoundary {
                domain: self.domain.clone(),
            });
        }

        if self.visited.contains(url) {
            return Err(FetchRejection::AlreadyVisited);
        }

        let Some(_guard) = self.path.enter(url) else {
            return Err(FetchRejection::Circular);
        };

        let body = fetch_text(&self.client, url)
            .await
            .map_err(FetchRejection::Transport)?;

        self.visited.insert(url.to_string());
        Ok(body)
    }

    fn record(&mut self, url: &str, rejection: &FetchRejection) {
        match rejection {
            FetchRejection::DomainBoundary { .. } => {
                self.rejections.off_domain += 1;
                log::debug!("Skipping external URL {url}: {rejection}");
            }
            FetchRejection::AlreadyVisited => {
                self.rejections.duplicates += 1;
                log::debug!("Skipping already processed URL: {url}");
            }
            FetchRejection::Circular => {
                self.rejections.circular += 1;
                log::debug!("Detected circular reference, skipping: {url}");
            }
            FetchRejection::Transport(e) => {
                self.rejections.transport += 1;
                log::warn!("Error fetching URL {url}: {e}");
            }
        }
    }

    /// Host every fetched URL must share.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn path(&self) -> &PathStack {
        &self.path
    }

    pub fn rejections(&self) -> RejectionCounts {
        self.rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher_for(base_url: &str) -> PageFetcher {
        PageFetcher::new(Client::new(), base_url).unwrap()
    }

    #[test]
    fn test_base_url_without_host() {
        assert!(PageFetcher::new(Client::new(), "not-a-url").is_err());
    }

    #[test]
    fn test_path_stack_rejects_cycle() {
        let mut stack = PathStack::default();
        {
            let mut a = stack.enter("https://example.edu/a").unwrap();
            let mut b = a.enter("https://example.edu/b").unwrap();
            assert_eq!(b.stack().len(), 2);
            assert!(b.enter("https://example.edu/a").is_none());
            assert!(b.stack().contains("https://example.edu/a"));
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_path_stack_allows_reentry_after_unwind() {
        let mut stack = PathStack::default();
        drop(stack.enter("https://example.edu/a"));
        assert!(stack.enter("https://example.edu/a").is_some());
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn test_off_domain_is_rejected_without_mutation() {
        let mut fetcher = fetcher_for("https://catalog.example.edu/");

        let body = fetcher.fetch("https://elsewhere.example.com/page").await;

        assert!(body.is_none());
        assert_eq!(fetcher.visited_count(), 0);
        assert!(fetcher.path().is_empty());
        assert_eq!(fetcher.rejections().off_domain, 1);
    }

    #[tokio::test]
    async fn test_second_fetch_is_noop() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/catalog")
            .with_status(200)
            .with_body("<html><body>Catalog</body></html>")
            .expect(1)
            .create_async()
            .await;
        let url = format!("{}/catalog", server.url());
        let mut fetcher = fetcher_for(&server.url());

        assert!(fetcher.fetch(&url).await.is_some());
        assert!(fetcher.fetch(&url).await.is_none());

        mock.assert_async().await;
        assert!(fetcher.is_visited(&url));
        assert_eq!(fetcher.visited_count(), 1);
        assert_eq!(fetcher.rejections().duplicates, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_unwinds_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;
        let url = format!("{}/broken", server.url());
        let mut fetcher = fetcher_for(&server.url());

        let result = fetcher.try_fetch(&url).await;

        assert!(matches!(result, Err(FetchRejection::Transport(_))));
        assert!(fetcher.path().is_empty());
        assert!(!fetcher.is_visited(&url));
    }

    #[tokio::test]
    async fn test_failed_url_may_be_retried_later() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/flaky")
            .with_status(404)
            .create_async()
            .await;
        let url = format!("{}/flaky", server.url());
        let mut fetcher = fetcher_for(&server.url());

        assert!(fetcher.fetch(&url).await.is_none());
        assert!(fetcher.fetch(&url).await.is_none());

        let counts = fetcher.rejections();
        assert_eq!(counts.transport, 2);
        assert_eq!(counts.duplicates, 0);
    }
}
