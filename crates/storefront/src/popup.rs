//! Once-per-day promotional popup.
//!
//! The last date the popup was shown lives under
//! [`keys::POPUP_LAST_SHOWN`](crate::storage::keys::POPUP_LAST_SHOWN) as
//! `YYYY-MM-DD`. When click gating is enabled the popup cannot be dismissed
//! until the affiliate link has been followed.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::storage::{Storage, StorageError, keys};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from popup gating.
#[derive(Debug, Error)]
pub enum PopupError {
    /// Dismissal attempted before the affiliate link was clicked.
    #[error("follow the affiliate link before closing this popup")]
    ClickRequired,

    /// Reading or writing the gating date failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Popup behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupConfig {
    pub require_affiliate_click: bool,
    pub affiliate_url: Option<Url>,
}

/// Decides whether to show the popup today and records when it was shown.
#[derive(Clone)]
pub struct DailyPopup {
    storage: Arc<dyn Storage>,
    config: PopupConfig,
}

impl DailyPopup {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: PopupConfig) -> Self {
        Self { storage, config }
    }

    /// Date the popup was last shown. An unparseable value counts as never.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn last_shown(&self) -> Result<Option<NaiveDate>, PopupError> {
        let Some(raw) = self.storage.get(keys::POPUP_LAST_SHOWN)? else {
            return Ok(None);
        };
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring unparseable popup date");
                Ok(None)
            }
        }
    }

    /// Whether the popup has not yet been shown on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn should_show(&self, today: NaiveDate) -> Result<bool, PopupError> {
        Ok(self.last_shown()?.is_none_or(|last| last < today))
    }

    /// Show the popup if it is due, recording `today` as the shown date.
    ///
    /// Returns `None` when it was already shown today.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn open(&self, today: NaiveDate) -> Result<Option<PopupSession>, PopupError> {
        if !self.should_show(today)? {
            debug!(%today, "Popup already shown today");
            return Ok(None);
        }
        self.storage.set(
            keys::POPUP_LAST_SHOWN,
            &today.format(DATE_FORMAT).to_string(),
        )?;
        debug!(%today, "Popup shown");
        Ok(Some(PopupSession {
            config: self.config.clone(),
            clicked: false,
        }))
    }
}

/// One showing of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSession {
    config: PopupConfig,
    clicked: bool,
}

impl PopupSession {
    /// Whether the close control is enabled.
    #[must_use]
    pub const fn can_dismiss(&self) -> bool {
        !self.config.require_affiliate_click || self.clicked
    }

    /// Follow the affiliate link, unlocking dismissal. Returns the URL to open.
    pub fn record_affiliate_click(&mut self) -> Option<&Url> {
        self.clicked = true;
        self.config.affiliate_url.as_ref()
    }

    /// Close the popup.
    ///
    /// # Errors
    ///
    /// Returns [`PopupError::ClickRequired`] if gating is on and the link
    /// has not been clicked.
    pub fn dismiss(self) -> Result<(), PopupError> {
        if self.can_dismiss() {
            Ok(())
        } else {
            Err(PopupError::ClickRequired)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn gated() -> PopupConfig {
        PopupConfig {
            require_affiliate_click: true,
            affiliate_url: Some(Url::parse("https://partner.example.com/deal").unwrap()),
        }
    }

    #[test]
    fn test_once_per_day() {
        let storage = Arc::new(MemoryStorage::new());
        let popup = DailyPopup::new(storage.clone(), PopupConfig::default());

        assert!(popup.open(day(19)).unwrap().is_some());
        assert!(popup.open(day(19)).unwrap().is_none());
        assert_eq!(
            storage.get(keys::POPUP_LAST_SHOWN).unwrap().as_deref(),
            Some("2026-10-19")
        );
        assert!(popup.should_show(day(20)).unwrap());
    }

    #[test]
    fn test_garbage_date_counts_as_never_shown() {
        let storage = Arc::new(MemoryStorage::with_entries([(
            keys::POPUP_LAST_SHOWN,
            "yesterday",
        )]));
        let popup = DailyPopup::new(storage, PopupConfig::default());
        assert!(popup.should_show(day(19)).unwrap());
    }

    #[test]
    fn test_ungated_dismiss() {
        let popup = DailyPopup::new(Arc::new(MemoryStorage::new()), PopupConfig::default());
        let session = popup.open(day(1)).unwrap().unwrap();
        assert!(session.can_dismiss());
        session.dismiss().unwrap();
    }

    #[test]
    fn test_gated_dismiss_requires_click() {
        let popup = DailyPopup::new(Arc::new(MemoryStorage::new()), gated());
        let mut session = popup.open(day(1)).unwrap().unwrap();

        assert!(!session.can_dismiss());
        assert!(matches!(
            session.clone().dismiss(),
            Err(PopupError::ClickRequired)
        ));

        let url = session.record_affiliate_click().unwrap();
        assert_eq!(url.host_str(), Some("partner.example.com"));
        session.dismiss().unwrap();
    }
}
