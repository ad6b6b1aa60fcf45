//! Daily popup commands.

use chrono::Local;
use clap::Subcommand;
use serde_json::json;

use shopfront_storefront::Shopfront;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum PopupAction {
    /// Whether the popup is due today (does not mark it shown)
    Check,
    /// Show the popup if due and close it without following the link
    Dismiss,
    /// Show the popup if due and follow the affiliate link
    Click,
}

pub fn run(shop: &Shopfront, action: PopupAction) -> Result {
    let today = Local::now().date_naive();

    if matches!(action, PopupAction::Check) {
        return emit(&json!({ "due": shop.popup.should_show(today)? }));
    }

    let Some(mut session) = shop.popup.open(today)? else {
        return emit(&json!({ "shown": false }));
    };

    match action {
        PopupAction::Check => Ok(()),
        PopupAction::Dismiss => {
            session.dismiss()?;
            emit(&json!({ "shown": true, "dismissed": true }))
        }
        PopupAction::Click => {
            let url = session.record_affiliate_click().map(ToString::to_string);
            session.dismiss()?;
            emit(&json!({ "shown": true, "affiliateUrl": url }))
        }
    }
}
