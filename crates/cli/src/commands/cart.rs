//! Cart commands.

use clap::Subcommand;
use serde_json::json;

use shopfront_core::{CartItemId, NewCartItem, ProductId};
use shopfront_storefront::Shopfront;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show items, totals, and the checkout summary
    Show,
    /// Add a product
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Change a line's quantity
    Update { item_id: String, quantity: u32 },
    /// Remove a line
    Remove { item_id: String },
    /// Empty the cart
    Clear,
}

pub async fn run(shop: &Shopfront, action: CartAction) -> Result {
    // Stock checks compare against the loaded lines.
    shop.cart.fetch().await?;

    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
            color,
            size,
            note,
        } => {
            let mut item = NewCartItem::new(ProductId::new(product_id), quantity);
            if let Some(color) = color {
                item = item.with_color(color);
            }
            if let Some(size) = size {
                item = item.with_size(size);
            }
            if let Some(note) = note {
                item = item.with_note(note);
            }
            shop.cart.add(&item).await?;
        }
        CartAction::Update { item_id, quantity } => {
            shop.cart
                .update_quantity(&CartItemId::new(item_id), quantity)
                .await?;
        }
        CartAction::Remove { item_id } => {
            shop.cart.remove(&CartItemId::new(item_id)).await?;
        }
        CartAction::Clear => shop.cart.clear().await?,
    }

    let state = shop.cart.state();
    emit(&json!({
        "items": state.items,
        "totals": state.totals,
        "summary": state.summary(),
    }))
}
