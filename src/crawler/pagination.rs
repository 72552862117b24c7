//! Pagination walker
//!
//! Walks the search-results index one page at a time, collecting detail URLs
//! and following the "next page" link until the site stops offering one.
//! Each next URL depends on the previous page's content, so the walk is
//! strictly sequential.

use crate::config::SiteProfile;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{extract_detail_urls, find_next_page, PageDocument};
use crate::crawler::progress::ProgressReporter;
use crate::FetchError;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Where the walk goes after a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkState {
    /// Another index page follows
    HasNext(Url),
    /// No further page
    Done,
}

/// State of one pagination walk
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub start_url: Url,

    /// Number of index pages processed so far
    pub page: usize,

    /// Detail URLs in page order, then document order
    pub detail_urls: Vec<Url>,

    /// Set once no further page will be fetched
    pub done: bool,

    visited: HashSet<Url>,
}

impl SearchSession {
    pub fn new(start_url: Url) -> Self {
        Self {
            start_url,
            page: 0,
            detail_urls: Vec::new(),
            done: false,
            visited: HashSet::new(),
        }
    }

    /// Records one processed index page and decides the next state
    ///
    /// The walk ends when there is no next link, when the next link points at
    /// an index page already walked, or when `max_pages` pages are done.
    pub fn advance(
        &mut self,
        page_url: Url,
        detail_urls: Vec<Url>,
        next: Option<Url>,
        max_pages: Option<usize>,
    ) -> WalkState {
        self.page += 1;
        self.visited.insert(page_url);
        self.detail_urls.extend(detail_urls);

        let state = match next {
            None => WalkState::Done,
            Some(next) if self.visited.contains(&next) => {
                tracing::warn!("Next page {} was already visited, stopping walk", next);
                WalkState::Done
            }
            Some(_) if max_pages.is_some_and(|max| self.page >= max) => {
                tracing::info!("Page limit of {} reached, stopping walk", self.page);
                WalkState::Done
            }
            Some(next) => WalkState::HasNext(next),
        };

        self.done = state == WalkState::Done;
        state
    }
}

/// Walks the paginated index from a start URL
pub struct PaginationWalker<'a> {
    fetcher: &'a Fetcher,
    site: &'a SiteProfile,
    progress: &'a dyn ProgressReporter,
    max_pages: Option<usize>,
    page_delay: Duration,
}

impl<'a> PaginationWalker<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        site: &'a SiteProfile,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            fetcher,
            site,
            progress,
            max_pages: None,
            page_delay: Duration::ZERO,
        }
    }

    /// Stops the walk after `max_pages` index pages
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Waits `delay` before every index page after the first
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Collects every detail URL reachable from `start_url`
    ///
    /// Any index page fetch failure aborts the walk.
    pub async fn walk(&self, start_url: &Url) -> Result<Vec<Url>, FetchError> {
        Ok(self.walk_session(start_url).await?.detail_urls)
    }

    /// Like [`walk`](Self::walk), returning the whole session
    pub async fn walk_session(&self, start_url: &Url) -> Result<SearchSession, FetchError> {
        let mut session = SearchSession::new(start_url.clone());
        let mut state = WalkState::HasNext(start_url.clone());

        while let WalkState::HasNext(current) = state {
            if let Some(delay) = delay_before(session.page, self.page_delay) {
                tokio::time::sleep(delay).await;
            }

            tracing::debug!("Fetching index page {}: {}", session.page + 1, current);
            let body = self.fetcher.fetch(&current).await?;
            let (detail_urls, next) = self.scan_page(&body, &current);
            let found = detail_urls.len();

            state = session.advance(current, detail_urls, next, self.max_pages);
            self.progress
                .index_page(session.page, found, session.detail_urls.len());
        }

        self.progress
            .walk_finished(session.page, session.detail_urls.len());
        Ok(session)
    }

    /// Extracts detail URLs and the next page link from one index page
    fn scan_page(&self, body: &str, page_url: &Url) -> (Vec<Url>, Option<Url>) {
        let document = PageDocument::parse(body);
        let detail_urls = extract_detail_urls(&document, &self.site.listing_links, page_url);
        let next = find_next_page(
            &document,
            &self.site.pagination,
            &self.site.next_page_text,
            page_url,
        );
        (detail_urls, next)
    }
}

/// Pause before the next index page; the first page is fetched at once
fn delay_before(pages_done: usize, delay: Duration) -> Option<Duration> {
    (pages_done > 0 && !delay.is_zero()).then_some(delay)
}
