//! Account commands.
//!
//! Passwords may come from `SHOPFRONT_PASSWORD` instead of the command line.

use clap::Subcommand;
use tracing::info;

use shopfront_storefront::Shopfront;
use shopfront_storefront::auth::{LoginCredentials, Registration};

use super::{Result, emit};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in user
    Me,
    /// Sign out and forget stored tokens
    Logout,
}

pub async fn run(shop: &Shopfront, action: AuthAction) -> Result {
    match action {
        AuthAction::Login { email, password } => {
            let user = shop
                .auth
                .login(&LoginCredentials::new(email, password))
                .await?;
            emit(&user)
        }
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let user = shop
                .auth
                .register(&Registration::new(name, email, password))
                .await?;
            emit(&user)
        }
        AuthAction::Me => {
            let user = shop.auth.current_user().await?;
            emit(&user)
        }
        AuthAction::Logout => {
            shop.logout().await;
            info!("Signed out");
            Ok(())
        }
    }
}
