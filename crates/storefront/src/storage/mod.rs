//! Durable client-side key/value storage.
//!
//! The client persists exactly four string keys (see [`keys`]): the access
//! and refresh tokens, the locale preference, and the popup gating date.
//! Every operation is a single synchronous read or write of one key, so
//! readers never observe a torn value. There is no cross-process
//! coordination: two processes sharing a file overwrite each other.
//!
//! # Backends
//!
//! - [`FileStorage`] - JSON file, survives restarts (production default)
//! - [`MemoryStorage`] - process-local map (tests, ephemeral sessions)

mod file;
mod memory;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key names.
pub mod keys {
    /// Bearer token attached to every request.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Token exchanged at `/auth/refresh` after a 401.
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// UI locale preference.
    pub const LOCALE: &str = "locale";
    /// Calendar date (`YYYY-MM-DD`) the daily popup was last shown.
    pub const POPUP_LAST_SHOWN: &str = "popup_last_shown";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON string map.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string key/value store that survives reloads.
pub trait Storage: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// An access/refresh token pair as issued by `/auth/login` and `/auth/refresh`.
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

impl TokenPair {
    /// Build a pair from plain strings.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

/// Typed access to the two token keys.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    /// Wrap a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The underlying storage, for the non-credential keys.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Stored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn access_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self.storage.get(keys::ACCESS_TOKEN)?.map(SecretString::from))
    }

    /// Stored refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn refresh_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self.storage.get(keys::REFRESH_TOKEN)?.map(SecretString::from))
    }

    /// Persist a new token pair. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.storage
            .set(keys::ACCESS_TOKEN, tokens.access_token.expose_secret())?;
        self.storage
            .set(keys::REFRESH_TOKEN, tokens.refresh_token.expose_secret())
    }

    /// Remove both token keys.
    ///
    /// Both removals are attempted even if the first one fails.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let access = self.storage.remove(keys::ACCESS_TOKEN);
        let refresh = self.storage.remove(keys::REFRESH_TOKEN);
        access.and(refresh)
    }

    /// Whether an access token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn has_session(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get(keys::ACCESS_TOKEN)?.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_save_and_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let creds = CredentialStore::new(storage.clone());

        assert!(!creds.has_session().unwrap());
        creds.save(&TokenPair::new("a1", "r1")).unwrap();
        assert_eq!(creds.access_token().unwrap().unwrap().expose_secret(), "a1");
        assert_eq!(creds.refresh_token().unwrap().unwrap().expose_secret(), "r1");

        storage.set(keys::LOCALE, "ko").unwrap();
        creds.clear().unwrap();
        assert!(creds.access_token().unwrap().is_none());
        assert!(creds.refresh_token().unwrap().is_none());
        // Only the token keys are cleared
        assert_eq!(storage.get(keys::LOCALE).unwrap().as_deref(), Some("ko"));
    }

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret-access"));
        assert!(debug.contains("[REDACTED]"));
    }
}
