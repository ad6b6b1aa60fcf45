//! Locale preference commands.

use clap::Subcommand;
use serde_json::json;

use shopfront_storefront::Shopfront;
use shopfront_storefront::preferences::Locale;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum LocaleAction {
    /// Show the stored locale
    Get,
    /// Store a locale (en or ko)
    Set { locale: Locale },
}

pub fn run(shop: &Shopfront, action: LocaleAction) -> Result {
    match action {
        LocaleAction::Get => {}
        LocaleAction::Set { locale } => shop.preferences.set_locale(locale)?,
    }
    emit(&json!({ "locale": shop.preferences.locale()?.as_str() }))
}
