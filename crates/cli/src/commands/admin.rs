//! Admin commands.
//!
//! Each command re-fetches the signed-in user and opens an admin session,
//! so a non-admin account is refused before any admin endpoint is called.

use clap::Subcommand;

use shopfront_admin::{AdminSession, OrdersAdmin, UsersAdmin, dashboard};
use shopfront_core::{ListQuery, OrderId, OrderStatus, Role, UserId};
use shopfront_storefront::Shopfront;

use super::{Result, emit};

#[derive(Subcommand)]
pub enum AdminAction {
    /// List orders, optionally filtered
    Orders {
        /// Order number or customer email contains
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// List users, optionally filtered
    Users {
        /// Name or email contains
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Change an order's status
    SetStatus { id: String, status: OrderStatus },
    /// Change a user's role
    SetRole { id: String, role: Role },
    /// Store statistics
    Dashboard,
}

async fn open_session(shop: &Shopfront) -> Result<AdminSession> {
    shop.auth.current_user().await?;
    Ok(AdminSession::from_auth(&shop.auth)?)
}

pub async fn run(shop: &Shopfront, action: AdminAction) -> Result {
    let session = open_session(shop).await?;

    match action {
        AdminAction::Orders { search, status } => {
            let orders = OrdersAdmin::new(session);
            orders.load().await?;
            emit(&orders.list(&ListQuery::all().search(&search).category(status)))
        }
        AdminAction::Users { search, role } => {
            let users = UsersAdmin::new(session);
            users.load().await?;
            emit(&users.list(&ListQuery::all().search(&search).category(role)))
        }
        AdminAction::SetStatus { id, status } => {
            let orders = OrdersAdmin::new(session);
            orders.load().await?;
            emit(&orders.set_status(&OrderId::new(id), status).await?)
        }
        AdminAction::SetRole { id, role } => {
            let users = UsersAdmin::new(session);
            users.load().await?;
            emit(&users.set_role(&UserId::new(id), role).await?)
        }
        AdminAction::Dashboard => emit(&dashboard(&session).await?),
    }
}
