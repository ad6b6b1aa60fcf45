//! Subcommand handlers.

use std::io::Write;

use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod locale;
pub mod orders;
pub mod popup;
pub mod wishlist;

/// Result of a subcommand.
pub type Result<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Print `value` to stdout as pretty JSON.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> Result {
    let json = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
