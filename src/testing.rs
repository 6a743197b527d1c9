//! Testing utilities for adapter and core tests.
//!
//! This module provides an in-memory [`PageFetcher`] so pagination-dependent
//! code can be tested without a network or a mock HTTP server, plus small
//! builders for collection fixtures.
//!
//! # Example
//!
//! ```
//! use dashboard_provider_core::testing::{paged_fetcher, record_seq};
//! use dashboard_provider_core::Paginator;
//!
//! # tokio_test::block_on(async {
//! let fetcher = paged_fetcher(record_seq(7), 3, "https://api.example.com/v1/devices");
//! let all = Paginator::new(3).fetch_all(&fetcher).await.unwrap();
//! assert_eq!(all.len(), 7);
//! assert_eq!(fetcher.calls(), 3);
//! # });
//! ```

use crate::error::CoreError;
use crate::pagination::{Cursor, Direction, PageFetcher, ResponseMeta};
use crate::value::{Collection, Record, Value};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A scripted page fetcher.
///
/// Serves the scripted `(page, meta)` pairs in order, one per call, and
/// records every cursor it is handed so tests can assert cursor propagation.
/// A call past the end of the script fails as an upstream error — a walker
/// that keeps fetching after the script ends is following a cursor it should
/// not have.
pub struct StaticPages {
    pages: Vec<(Collection, ResponseMeta)>,
    calls: AtomicUsize,
    received: Mutex<Vec<Option<Cursor>>>,
}

impl StaticPages {
    /// Create a fetcher serving the given pages in order.
    pub fn new(pages: Vec<(Collection, ResponseMeta)>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// How many times `fetch_page` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The cursors received, one per call, in call order.
    pub fn received(&self) -> Vec<Option<Cursor>> {
        self.received.lock().expect("cursor log poisoned").clone()
    }
}

#[async_trait]
impl PageFetcher for StaticPages {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<(Collection, ResponseMeta), CoreError> {
        self.received
            .lock()
            .expect("cursor log poisoned")
            .push(cursor.cloned());
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(index).cloned().ok_or_else(|| {
            CoreError::upstream(std::io::Error::other(format!(
                "scripted fetcher exhausted after {} page(s)",
                self.pages.len()
            )))
        })
    }
}

/// Build `count` records with `id` fields `id-0`, `id-1`, … in order.
pub fn record_seq(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .with_path_attr("id", format!("id-{}", i))
                .with_attr("name", format!("item-{}", i))
        })
        .collect()
}

/// Script a [`StaticPages`] fetcher that pages `records` in chunks of
/// `per_page` with dashboard-style `Link` headers.
///
/// Every page except the last carries a `rel="next"` link whose
/// `startingAfter` token is the page's boundary `id`; the last page carries
/// no `Link` header at all, which is how the server signals completion.
pub fn paged_fetcher(records: Vec<Record>, per_page: usize, base_url: &str) -> StaticPages {
    let chunks: Vec<Vec<Record>> = records
        .chunks(per_page.max(1))
        .map(|chunk| chunk.to_vec())
        .collect();
    let total = chunks.len();

    let pages = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let meta = if index + 1 < total {
                let boundary = chunk
                    .last()
                    .and_then(|record| record.get("id"))
                    .and_then(|value| match value {
                        Value::String(id) => Some(id.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();
                ResponseMeta::new(200).with_link(format!(
                    "<{}?perPage={}&{}={}>; rel=\"next\", <{}?perPage={}>; rel=\"first\"",
                    base_url,
                    per_page,
                    Direction::StartingAfter.query_param(),
                    boundary,
                    base_url,
                    per_page,
                ))
            } else {
                ResponseMeta::new(200)
            };
            (Collection::from(chunk), meta)
        })
        .collect();

    StaticPages::new(pages)
}
