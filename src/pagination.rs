//! Cursor-based pagination over `Link`-header collections.
//!
//! The dashboard API pages collections with RFC5988-style `Link` response
//! headers: a comma-separated list of `<url>; rel="first|prev|next|last"`
//! entries whose URLs carry the continuation cursor as a `startingAfter` or
//! `endingBefore` query parameter. [`Paginator::fetch_all`] follows the
//! `rel="next"` chain until the server stops producing one, accumulating all
//! pages in server order.
//!
//! The page fetch itself is injected through [`PageFetcher`]; the walker owns
//! only the cursor protocol, so an offset- or token-paged API can be swapped
//! in behind the same trait without touching lookup or merge.

use crate::error::CoreError;
use crate::value::Collection;
use async_trait::async_trait;
use url::Url;

/// Default page-size ceiling the dashboard API accepts.
pub const DEFAULT_PER_PAGE: usize = 1000;

/// Which end of the collection a cursor continues from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Resume with elements after the token (`startingAfter`).
    StartingAfter,
    /// Resume with elements before the token (`endingBefore`).
    EndingBefore,
}

impl Direction {
    /// The query parameter name carrying this cursor in page URLs.
    pub fn query_param(&self) -> &'static str {
        match self {
            Direction::StartingAfter => "startingAfter",
            Direction::EndingBefore => "endingBefore",
        }
    }
}

/// An opaque continuation token plus its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// The opaque token, usually the boundary element's ID.
    pub token: String,
    /// Which direction the token continues from.
    pub direction: Direction,
}

impl Cursor {
    /// Create a `startingAfter` cursor.
    pub fn starting_after(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            direction: Direction::StartingAfter,
        }
    }

    /// Create an `endingBefore` cursor.
    pub fn ending_before(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            direction: Direction::EndingBefore,
        }
    }
}

/// The HTTP surface of one page response, as exposed by the vendor SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// The `Link` response header, when the server sent one.
    pub link: Option<String>,
}

impl ResponseMeta {
    /// Create a meta for the given status with no body or `Link` header.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Attach the raw response body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach a `Link` response header.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// One `<url>; rel="..."` entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// The page URL.
    pub url: Url,
    /// The relation: `first`, `prev`, `next`, or `last`.
    pub rel: String,
}

/// Parse an RFC5988-style `Link` header into its entries.
///
/// Entries missing the `<url>` form, carrying an unparseable URL, or lacking
/// a `rel` parameter are [`CoreError::Pagination`].
pub fn parse_link_header(header: &str) -> Result<Vec<LinkEntry>, CoreError> {
    let mut entries = Vec::new();
    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let mut segments = part.split(';');
        let target = segments.next().unwrap_or("").trim();
        let raw_url = target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or_else(|| CoreError::pagination(format!("malformed Link entry '{}'", part)))?;
        let url = Url::parse(raw_url).map_err(|err| {
            CoreError::pagination(format!("unparseable URL in Link entry '{}': {}", raw_url, err))
        })?;

        let mut rel = None;
        for param in segments {
            if let Some(value) = param.trim().strip_prefix("rel=") {
                rel = Some(value.trim_matches('"').to_string());
            }
        }
        let rel = rel.ok_or_else(|| {
            CoreError::pagination(format!("Link entry '{}' has no rel parameter", part))
        })?;
        entries.push(LinkEntry { url, rel });
    }
    Ok(entries)
}

/// Extract the next-page cursor from a page's response metadata.
///
/// - No `Link` header, or no `rel="next"` entry → `Ok(None)`: the server is
///   done.
/// - A `Link` header that does not parse → [`CoreError::Pagination`].
/// - A `rel="next"` URL with neither `startingAfter` nor `endingBefore` →
///   [`CoreError::Pagination`]: a next link that cannot be followed must
///   abort the walk rather than refetch the same page forever.
pub fn next_cursor(meta: &ResponseMeta) -> Result<Option<Cursor>, CoreError> {
    let Some(header) = meta.link.as_deref() else {
        return Ok(None);
    };
    let entries = parse_link_header(header)?;
    let Some(next) = entries.into_iter().find(|entry| entry.rel == "next") else {
        return Ok(None);
    };

    for (key, value) in next.url.query_pairs() {
        let direction = match key.as_ref() {
            "startingAfter" => Direction::StartingAfter,
            "endingBefore" => Direction::EndingBefore,
            _ => continue,
        };
        return Ok(Some(Cursor {
            token: value.into_owned(),
            direction,
        }));
    }
    Err(CoreError::pagination(format!(
        "rel=\"next\" link carries no startingAfter/endingBefore cursor: {}",
        next.url
    )))
}

/// Fetches one page of a collection.
///
/// Implementations wrap a vendor SDK list call: `cursor` is `None` for the
/// first page and the previous page's continuation afterwards. Errors are
/// propagated verbatim by the walker with no retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page, returning its records and the response metadata the
    /// cursor is extracted from.
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<(Collection, ResponseMeta), CoreError>;
}

/// Walks a paged collection to completion.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Paginator {
    /// Create a paginator for the given page-size ceiling.
    pub fn new(per_page: usize) -> Self {
        Self { per_page }
    }

    /// The configured page-size ceiling.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Fetch every page of a collection, preserving server order.
    ///
    /// The first call passes no cursor. After each page the walk continues
    /// only when the page was full (its size reached the ceiling) *and*
    /// [`next_cursor`] yields a continuation; a short page, a missing `Link`
    /// header, or a `Link` header without a `rel="next"` entry all end the
    /// walk cleanly. Pages are fetched strictly sequentially — each cursor
    /// depends on the previous response.
    ///
    /// Any fetch error aborts the walk; pages already accumulated are
    /// discarded, so callers never observe partial success.
    pub async fn fetch_all<F>(&self, fetcher: &F) -> Result<Collection, CoreError>
    where
        F: PageFetcher + ?Sized,
    {
        let mut all = Collection::new();
        let mut cursor: Option<Cursor> = None;
        let mut page_no = 0usize;

        loop {
            let (page, meta) = fetcher.fetch_page(cursor.as_ref()).await?;
            page_no += 1;
            let full = page.len() >= self.per_page;
            tracing::debug!(
                page = page_no,
                items = page.len(),
                status = meta.status,
                "fetched collection page"
            );
            all.extend(page);

            if !full {
                break;
            }
            match next_cursor(&meta)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::debug!(pages = page_no, items = all.len(), "collection walk complete");
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{paged_fetcher, record_seq, StaticPages};
    use crate::value::{Record, Value};

    #[test]
    fn test_parse_link_header() {
        let header = "<https://api.example.com/v1/organizations/1/networks?perPage=3&startingAfter=N_3>; rel=\"next\", \
                      <https://api.example.com/v1/organizations/1/networks?perPage=3>; rel=\"first\"";
        let entries = parse_link_header(header).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rel, "next");
        assert_eq!(entries[1].rel, "first");
    }

    #[test]
    fn test_parse_link_header_rejects_garbage() {
        assert!(parse_link_header("not a link header").is_err());
        assert!(parse_link_header("<::::>; rel=\"next\"").is_err());
        assert!(parse_link_header("<https://api.example.com/x>").is_err());
    }

    #[test]
    fn test_next_cursor_directions() {
        let meta = ResponseMeta::new(200)
            .with_link("<https://api.example.com/x?startingAfter=N_9>; rel=\"next\"");
        assert_eq!(next_cursor(&meta).unwrap(), Some(Cursor::starting_after("N_9")));

        let meta = ResponseMeta::new(200)
            .with_link("<https://api.example.com/x?endingBefore=N_2>; rel=\"next\"");
        assert_eq!(next_cursor(&meta).unwrap(), Some(Cursor::ending_before("N_2")));
    }

    #[test]
    fn test_next_cursor_absent() {
        assert_eq!(next_cursor(&ResponseMeta::new(200)).unwrap(), None);

        let meta = ResponseMeta::new(200)
            .with_link("<https://api.example.com/x?perPage=10>; rel=\"prev\"");
        assert_eq!(next_cursor(&meta).unwrap(), None);
    }

    #[test]
    fn test_next_cursor_requires_cursor_param() {
        let meta = ResponseMeta::new(200)
            .with_link("<https://api.example.com/x?perPage=10>; rel=\"next\"");
        assert!(matches!(next_cursor(&meta), Err(CoreError::Pagination(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_walks_every_page() {
        // 2 full pages of 3 plus a partial page of 2 => 8 items, 3 calls.
        let fetcher = paged_fetcher(record_seq(8), 3, "https://api.example.com/v1/things");

        let all = Paginator::new(3).fetch_all(&fetcher).await.unwrap();
        assert_eq!(all.len(), 8);
        assert_eq!(fetcher.calls(), 3);

        let ids: Vec<_> = all
            .items()
            .iter()
            .map(|r| r.get("id").cloned().unwrap())
            .collect();
        let expected: Vec<_> = (0..8).map(|i| Value::from(format!("id-{}", i))).collect();
        assert_eq!(ids, expected);

        // Each follow-up call carried the previous page's boundary cursor.
        assert_eq!(
            fetcher.received(),
            vec![
                None,
                Some(Cursor::starting_after("id-2")),
                Some(Cursor::starting_after("id-5")),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_single_partial_page() {
        let fetcher = paged_fetcher(record_seq(2), 5, "https://api.example.com/v1/things");
        let all = Paginator::new(5).fetch_all(&fetcher).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_full_page_without_next_link() {
        // A final page that happens to be exactly full: no Link header means
        // the server is done, not a protocol error.
        let fetcher = StaticPages::new(vec![(
            Collection::from(record_seq(3)),
            ResponseMeta::new(200),
        )]);
        let all = Paginator::new(3).fetch_all(&fetcher).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_full_page_with_no_next_rel() {
        let fetcher = StaticPages::new(vec![(
            Collection::from(record_seq(3)),
            ResponseMeta::new(200)
                .with_link("<https://api.example.com/v1/things?perPage=3>; rel=\"first\""),
        )]);
        let all = Paginator::new(3).fetch_all(&fetcher).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_errors_on_unparseable_link() {
        let fetcher = StaticPages::new(vec![(
            Collection::from(record_seq(3)),
            ResponseMeta::new(200).with_link("garbage"),
        )]);
        let err = Paginator::new(3).fetch_all(&fetcher).await.unwrap_err();
        assert!(matches!(err, CoreError::Pagination(_)));
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_upstream_error() {
        let fetcher = StaticPages::new(vec![(
            Collection::from(record_seq(3)),
            ResponseMeta::new(200)
                .with_link("<https://api.example.com/v1/things?startingAfter=id-2>; rel=\"next\""),
        )]);
        // The script has one page; the cursor demands a second, which the
        // harness reports as an upstream failure. Nothing partial comes back.
        let err = Paginator::new(3).fetch_all(&fetcher).await.unwrap_err();
        assert!(matches!(err, CoreError::Upstream(_)));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_empty_collection() {
        let fetcher = StaticPages::new(vec![(Collection::new(), ResponseMeta::new(200))]);
        let all = Paginator::new(10).fetch_all(&fetcher).await.unwrap();
        assert!(all.is_empty());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_via_trait_object() {
        let fetcher = StaticPages::new(vec![(
            Collection::from(vec![Record::new().with_attr("id", "only")]),
            ResponseMeta::new(200),
        )]);
        let boxed: &dyn PageFetcher = &fetcher;
        let all = Paginator::default().fetch_all(boxed).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
