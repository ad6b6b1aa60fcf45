//! UI locale preference.

use std::sync::Arc;

use thiserror::Error;

use crate::storage::{Storage, StorageError, keys};

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::En, Self::Ko];

    /// BCP 47 tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ko => "ko",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str() == tag)
            .ok_or_else(|| PreferenceError::UnsupportedLocale(s.to_string()))
    }
}

/// Errors from preference reads and writes.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Stored user preferences.
#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn Storage>,
}

impl Preferences {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Stored locale, or the default when unset or unsupported.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn locale(&self) -> Result<Locale, PreferenceError> {
        Ok(self
            .storage
            .get(keys::LOCALE)?
            .and_then(|tag| tag.parse().ok())
            .unwrap_or_default())
    }

    /// Persist a locale.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set_locale(&self, locale: Locale) -> Result<(), PreferenceError> {
        self.storage.set(keys::LOCALE, locale.as_str())?;
        Ok(())
    }
}
