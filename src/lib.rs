// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # docshelf
//!
//! A searchable catalog of downloadable documents, fed by a published
//! spreadsheet export, where every download goes through a link-shortening
//! service.
//!
//! ## Architecture
//!
//! - **Configuration** (`config`): one explicit [`config::ShelfConfig`] per session
//! - **Feed parser** (`library::feed`, `library::tabular`): CSV text → validated records
//! - **Catalog** (`library::catalog`): immutable, id-ordered record set
//! - **Search** (`library::search`): diacritic-insensitive substring filter
//! - **Download proxy** (`library::proxy`): per-record async shortening with in-flight tracking
//!
//! ## Library usage
//!
//! ```no_run
//! use docshelf::config::ShelfConfig;
//! use docshelf::library::Session;
//!
//! # async fn run() -> docshelf::error::ShelfResult<()> {
//! let config = ShelfConfig::from_env()?;
//! let mut session = Session::start(&config).await?;
//! let first = session.search("dai so").first().map(|r| r.id.get());
//! if let Some(id) = first {
//!     let link = session.request_download(id).await?;
//!     println!("{link}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod library;
