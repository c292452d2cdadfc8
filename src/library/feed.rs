//! Feed ingestion: remote fetch and row validation.
//!
//! The feed is a published spreadsheet export with a header row. Each data
//! row is judged on its own; rows with a missing or invalid id, title or
//! link are dropped without failing the batch. Only a feed that cannot be
//! fetched or read as delimited text at all is an error.

use crate::config::{FeedColumns, ShelfConfig};
use crate::library::catalog::Catalog;
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::CatalogRecord;
use crate::library::tabular;

/// Outcome of parsing a feed payload.
#[derive(Debug)]
pub struct FeedParse {
    pub catalog: Catalog,
    /// Data rows that failed validation.
    pub dropped: usize,
}

/// Parse a feed payload into a catalog.
///
/// `source` names the feed in error messages.
pub fn parse_feed(text: &str, columns: &FeedColumns, source: &str) -> LibraryResult<FeedParse> {
    let unavailable = |message: String| LibraryError::FeedUnavailable {
        url: source.to_string(),
        message,
    };

    let rows = tabular::read_records(text).map_err(|e| unavailable(e.to_string()))?;
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| unavailable("payload has no header row".into()))?
        .map_err(|e| unavailable(format!("unreadable header row: {e}")))?;

    let position = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| unavailable(format!("header has no `{name}` column")))
    };
    let id_col = position(&columns.id)?;
    let title_col = position(&columns.title)?;
    let link_col = position(&columns.source_link)?;

    let mut records = Vec::new();
    let mut dropped = 0;
    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, source, "skipping malformed feed row");
                dropped += 1;
                continue;
            }
        };
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        match CatalogRecord::from_cells(cell(id_col), cell(title_col), cell(link_col)) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, source, "feed rows failed validation");
    }

    Ok(FeedParse {
        catalog: Catalog::from_records(records),
        dropped,
    })
}

/// Fetch the raw feed payload.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> LibraryResult<String> {
    let unavailable = |message: String| LibraryError::FeedUnavailable {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("request failed (status: {})", status.as_u16())));
    }

    response
        .text()
        .await
        .map_err(|e| unavailable(format!("read body: {e}")))
}

/// Fetch and parse the configured feed.
pub async fn load_catalog(client: &reqwest::Client, config: &ShelfConfig) -> LibraryResult<Catalog> {
    let text = fetch_feed(client, &config.feed_url).await?;
    let parsed = parse_feed(&text, &config.columns, &config.feed_url)?;
    tracing::info!(
        records = parsed.catalog.len(),
        dropped = parsed.dropped,
        "catalog loaded"
    );
    Ok(parsed.catalog)
}
