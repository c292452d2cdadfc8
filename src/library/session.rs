//! One browsing session: catalog, current search and download proxy.

use crate::config::ShelfConfig;
use crate::library::catalog::Catalog;
use crate::library::error::{LibraryError, LibraryResult};
use crate::library::feed;
use crate::library::model::{CatalogRecord, ProxyState, RecordId};
use crate::library::proxy::DownloadProxy;
use crate::library::search::{paginate, Page, SearchState};

/// Catalog, search state and download proxy for one session.
///
/// The catalog is loaded once at [`Session::start`] and never mutated.
pub struct Session {
    catalog: Catalog,
    search: SearchState,
    proxy: DownloadProxy,
    logo_url: String,
    page_size: usize,
}

impl Session {
    /// Validate `config`, load the catalog from the feed and build the proxy.
    ///
    /// Fails with [`LibraryError::FeedUnavailable`] if no catalog can be built.
    pub async fn start(config: &ShelfConfig) -> LibraryResult<Self> {
        config.validate()?;
        let client = config.http_client()?;
        let catalog = feed::load_catalog(&client, config).await?;
        let proxy = DownloadProxy::with_client(config, client)?;
        Ok(Self::assemble(catalog, proxy, config))
    }

    /// Build a session around an already-loaded catalog.
    pub fn from_catalog(catalog: Catalog, config: &ShelfConfig) -> LibraryResult<Self> {
        let proxy = DownloadProxy::new(config)?;
        Ok(Self::assemble(catalog, proxy, config))
    }

    fn assemble(catalog: Catalog, proxy: DownloadProxy, config: &ShelfConfig) -> Self {
        Self {
            catalog,
            search: SearchState::default(),
            proxy,
            logo_url: config.logo_url.clone(),
            page_size: config.page_size,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn proxy(&self) -> &DownloadProxy {
        &self.proxy
    }

    pub fn logo_url(&self) -> &str {
        &self.logo_url
    }

    pub fn query_text(&self) -> &str {
        self.search.query_text()
    }

    /// Replace the query and return the new visible set.
    pub fn search(&mut self, query: &str) -> Vec<&CatalogRecord> {
        self.search.set_query(query);
        self.search.visible(&self.catalog)
    }

    /// Visible set for the current query.
    pub fn visible(&self) -> Vec<&CatalogRecord> {
        self.search.visible(&self.catalog)
    }

    /// Page of `records` at the configured page size.
    pub fn page<'a, T>(&self, records: &'a [T], number: usize) -> Page<'a, T> {
        paginate(records, number, self.page_size)
    }

    /// Whether a download link is currently being requested for `id`.
    pub fn state(&self, id: RecordId) -> ProxyState {
        self.proxy.state(id)
    }

    /// Request a shortened download link for the record with `id`.
    pub async fn request_download(&self, id: u64) -> LibraryResult<String> {
        let record = RecordId::new(id)
            .and_then(|id| self.catalog.get(id))
            .ok_or(LibraryError::RecordNotFound { id })?;
        self.proxy.request_link(record).await
    }
}
