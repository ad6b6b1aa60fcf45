//! Wishlist commands.

use clap::Subcommand;

use shopfront_core::ProductId;
use shopfront_storefront::Shopfront;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product
    Add { product_id: String },
    /// Remove a saved product
    Remove { product_id: String },
}

pub async fn run(shop: &Shopfront, action: WishlistAction) -> Result {
    match action {
        WishlistAction::Show => {
            shop.wishlist.fetch().await?;
        }
        WishlistAction::Add { product_id } => {
            shop.wishlist.fetch().await?;
            shop.wishlist.add(&ProductId::new(product_id)).await?;
        }
        WishlistAction::Remove { product_id } => {
            shop.wishlist.fetch().await?;
            shop.wishlist.remove(&ProductId::new(product_id)).await?;
        }
    }
    emit(&shop.wishlist.items())
}
