//! Top-level error type for docshelf.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives; [`ShelfError`] wraps them so the binary can report any of them
//! with codes and help text intact.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::library::LibraryError;

#[derive(Debug, Error, Diagnostic)]
pub enum ShelfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Library(#[from] LibraryError),
}

pub type ShelfResult<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use miette::Diagnostic;

    use super::*;
    use crate::library::RecordId;

    #[test]
    fn wraps_subsystem_errors_transparently() {
        let err: ShelfError = ConfigError::Missing {
            key: "api_key",
            env: "DOCSHELF_API_KEY",
        }
        .into();
        assert_eq!(err.to_string(), "missing configuration value: api_key");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("docshelf::config::missing")
        );

        let err: ShelfError = LibraryError::ShortenFailed {
            id: RecordId::new(3).unwrap(),
            cause: "request failed (status: 500)".into(),
        }
        .into();
        assert!(err.to_string().contains("status: 500"));
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("docshelf::library::shorten_failed")
        );
    }
}
