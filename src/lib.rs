//! Dashboard Provider Core
//!
//! The hand-written reconciliation and pagination engine behind the generated
//! resources of a dashboard-API Terraform provider. The generated layer — one
//! file per API object, mapping wire responses into typed configuration
//! trees — is mechanical; everything with actual algorithmic content funnels
//! through the three pieces in this crate:
//!
//! - **State merge** ([`merge`]): fold an authoritative API response into the
//!   user's desired state, producing the record Terraform persists. The
//!   server wins where it has an opinion; fields it leaves unset keep the
//!   desired value.
//! - **Keyed lookup** ([`find_by_field`]): locate an element of a fetched
//!   collection by a natural key such as a name, so `Create` can adopt a
//!   pre-existing object instead of colliding with it. The API has no
//!   server-side upsert.
//! - **Pagination** ([`Paginator`]): follow the server's `Link`-header cursor
//!   chain (`startingAfter`/`endingBefore`) until a collection is complete.
//!
//! All three operate on the [`Value`]/[`Record`] attribute model, in which
//! "unset" is an explicit state ([`Value::Null`]/[`Value::Unknown`]) and
//! never a zero value.
//!
//! # Quick Start
//!
//! The adopt-or-create flow a generated resource runs during `Create`:
//!
//! ```
//! use dashboard_provider_core::{
//!     find_by_field, merge, Paginator, Record, Value,
//!     testing::paged_fetcher,
//! };
//!
//! # tokio_test::block_on(async {
//! let desired = Record::new()
//!     .with_path_attr("id", Value::Null)
//!     .with_attr("name", "item-4");
//!
//! // Fetch the full collection, then look for our natural key.
//! let fetcher = paged_fetcher(
//!     dashboard_provider_core::testing::record_seq(10),
//!     3,
//!     "https://api.example.com/v1/organizations/1/networks",
//! );
//! let existing = Paginator::new(3).fetch_all(&fetcher).await.unwrap();
//!
//! match find_by_field(&existing, "name", &Value::from("item-4")) {
//!     Some(found) => {
//!         // Adopt: fold the server's view into our desired state.
//!         let state = merge(&desired, found, false).unwrap();
//!         assert_eq!(state.get("id"), Some(&Value::String("id-4".into())));
//!     }
//!     None => {
//!         // Does not exist remotely yet: create it, then merge the create
//!         // response with `only_path = true`.
//!     }
//! }
//! # });
//! ```
//!
//! # Boundaries
//!
//! HTTP transport, authentication, the API surface itself, and Terraform's
//! plan/diff engine all live outside this crate. The core is synchronous per
//! resource operation, holds no shared mutable state, never retries, and
//! never logs diagnostics — errors return to the adapter layer, which owns
//! user-facing reporting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coerce;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod merge;
pub mod pagination;
pub mod testing;
pub mod value;

// Re-export main types at crate root
pub use error::{BoxError, CoreError};
pub use logging::{init_logging, try_init_logging};
pub use lookup::{find_by_field, find_by_field_with, values_match};
pub use merge::{merge, Mergeable};
pub use pagination::{
    next_cursor, parse_link_header, Cursor, Direction, LinkEntry, PageFetcher, Paginator,
    ResponseMeta, DEFAULT_PER_PAGE,
};
pub use value::{Collection, Kind, Record, Value};

// Re-export async_trait for PageFetcher implementations
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
