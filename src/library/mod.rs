//! Searchable document catalog with proxied download links.
//!
//! The pipeline runs leaf-first:
//! feed text → [`feed::parse_feed`] → [`Catalog`] → [`search::filter`]
//! → visible records → [`DownloadProxy::request_link`] → shortened link.
//!
//! [`Session`] ties these together for one session.

pub mod catalog;
pub mod error;
pub mod feed;
pub mod model;
pub mod proxy;
pub mod search;
pub mod session;
pub mod tabular;

pub use catalog::Catalog;
pub use error::{LibraryError, LibraryResult};
pub use feed::{fetch_feed, load_catalog, parse_feed, FeedParse};
pub use model::{CatalogRecord, ProxyState, RecordId};
pub use proxy::DownloadProxy;
pub use search::{filter, normalize, paginate, Page, SearchState};
pub use session::Session;
