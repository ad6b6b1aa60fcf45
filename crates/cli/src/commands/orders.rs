//! Order and checkout commands.

use clap::{Args, Subcommand};

use shopfront_core::{OrderId, PaymentMethod, ShippingAddress};
use shopfront_storefront::Shopfront;
use shopfront_storefront::orders::Checkout;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
    /// Request cancellation of a pending or processing order
    Cancel { id: String },
    /// Place an order from the current cart
    Place(PlaceArgs),
}

#[derive(Args)]
pub struct PlaceArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: String,
    /// card, bank_transfer, or cash_on_delivery
    #[arg(long, default_value = "card")]
    payment: PaymentMethod,
}

impl From<PlaceArgs> for Checkout {
    fn from(args: PlaceArgs) -> Self {
        Self {
            shipping_address: ShippingAddress {
                full_name: args.full_name,
                phone: args.phone,
                address: args.address,
                city: args.city,
                postal_code: args.postal_code,
                country: args.country,
            },
            payment_method: args.payment,
        }
    }
}

pub async fn run(shop: &Shopfront, action: OrdersAction) -> Result {
    match action {
        OrdersAction::List => emit(&shop.orders.list().await?),
        OrdersAction::Show { id } => emit(&shop.orders.get(&OrderId::new(id)).await?),
        OrdersAction::Cancel { id } => {
            let id = OrderId::new(id);
            // Load the current status so a shipped order is refused locally.
            shop.orders.get(&id).await?;
            emit(&shop.orders.cancel(&id).await?)
        }
        OrdersAction::Place(args) => {
            shop.cart.fetch().await?;
            emit(&shop.orders.place(&args.into()).await?)
        }
    }
}
