//! Rich diagnostic error types for the document library.

use miette::Diagnostic;
use thiserror::Error;

use crate::library::model::RecordId;

/// Errors from catalog loading and download-link operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("feed unavailable from \"{url}\": {message}")]
    #[diagnostic(
        code(docshelf::library::feed_unavailable),
        help(
            "The document feed could not be fetched or is not delimited tabular text. \
             Check that `feed_url` points at a published CSV export and that its header \
             row names the configured id, title and link columns."
        )
    )]
    FeedUnavailable { url: String, message: String },

    #[error("could not create download link for record {id}: {cause}")]
    #[diagnostic(
        code(docshelf::library::shorten_failed),
        help(
            "The link-shortening service did not return a usable link. \
             The catalog is unaffected; retry the download."
        )
    )]
    ShortenFailed { id: RecordId, cause: String },

    #[error("a download link for record {id} is already being requested")]
    #[diagnostic(
        code(docshelf::library::already_in_flight),
        help("Wait for the outstanding request for this record to finish.")
    )]
    AlreadyInFlight { id: RecordId },

    #[error("record not found: {id}")]
    #[diagnostic(
        code(docshelf::library::not_found),
        help("No record with this id exists in the catalog. List records with `docshelf list`.")
    )]
    RecordNotFound { id: u64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Convenience alias for library operation results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
