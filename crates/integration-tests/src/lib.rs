//! Integration test harness for Shopfront.
//!
//! Starts an in-process mock of the storefront JSON API on an ephemeral
//! port and builds [`Shopfront`] clients that talk to it over real HTTP
//! through `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Seed Data
//!
//! | Email              | Password     | Role  |
//! |--------------------|--------------|-------|
//! | `root@shop.com`    | `root-pass`  | ADMIN |
//! | `john@shop.com`    | `john-pass`  | USER  |
//! | `johnny@shop.com`  | `johnny-pass`| ADMIN |
//! | `ann@shop.com`     | `ann-pass`   | USER  |
//!
//! Products `tee` (20.00, stock 5) and `cap` (15.00, stock 3).

mod server;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use shopfront_storefront::Shopfront;
use shopfront_storefront::http::{ReqwestTransport, TransportError};
use shopfront_storefront::popup::PopupConfig;
use shopfront_storefront::storage::MemoryStorage;

pub use server::{MockApi, ServerStats};

/// A running mock API plus helpers to build clients against it.
pub struct TestContext {
    pub api: MockApi,
    pub base_url: Url,
}

/// Errors starting the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to bind mock API: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid mock API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl TestContext {
    /// Start a freshly seeded mock API.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> Result<Self, HarnessError> {
        let api = MockApi::start().await?;
        let base_url = Self::url_for(api.addr())?;
        Ok(Self { api, base_url })
    }

    fn url_for(addr: SocketAddr) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{addr}/api/"))
    }

    /// A client with empty in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn shop(&self) -> Result<Shopfront, HarnessError> {
        self.shop_with_storage(Arc::new(MemoryStorage::new()))
    }

    /// A client over the given storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn shop_with_storage(
        &self,
        storage: Arc<MemoryStorage>,
    ) -> Result<Shopfront, HarnessError> {
        let transport = ReqwestTransport::new(self.base_url.clone(), Duration::from_secs(5))?;
        Ok(Shopfront::new(
            Arc::new(transport),
            storage,
            PopupConfig::default(),
        ))
    }
}
