//! Shopfront Core - Shared domain types and pure computations.
//!
//! This crate provides the types used across all Shopfront components:
//! - `storefront` - Client library (HTTP wrapper, auth/cart/wishlist stores)
//! - `admin` - Role-gated admin list views
//! - `cli` - Command-line driver for the client library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. Everything here is deterministic, so the
//! cart and checkout arithmetic can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and statuses
//! - [`models`] - Read-models mirrored from the remote store
//! - [`totals`] - Cart item count and subtotal fold
//! - [`summary`] - Shipping, tax, and total derivation
//! - [`query`] - Client-side search and filter predicates for list views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod query;
pub mod summary;
pub mod totals;
pub mod types;

pub use models::*;
pub use query::{ListQuery, Searchable};
pub use summary::OrderSummary;
pub use totals::CartTotals;
pub use types::*;
