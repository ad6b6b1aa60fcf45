//! Read-models mirrored from the remote store.
//!
//! These are denormalized copies. The server stays the source of truth and
//! every fetch replaces them wholesale.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;
pub mod wishlist;

pub use cart::{CartItem, NewCartItem};
pub use catalog::{Category, Product, ProductPage, ProductSummary};
pub use order::{Order, OrderCustomer, OrderItem, PaymentMethod, ShippingAddress};
pub use user::User;
pub use wishlist::WishlistItem;
