//! Shopfront CLI - drive the storefront API from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (tokens are kept in SHOPFRONT_STORAGE_PATH)
//! sf-cli auth login -e jane@example.com -p hunter2
//!
//! # Add two of a product to the cart and show the checkout summary
//! sf-cli cart add prod_123 -q 2 --size M
//! sf-cli cart show
//!
//! # Admin: shipped orders for a customer
//! sf-cli admin orders --search jane --status shipped
//! ```
//!
//! Results are printed to stdout as JSON. Logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shopfront_storefront::Shopfront;
use shopfront_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, register, sign out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistAction,
    },
    /// Order history and checkout
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
    /// Browse products and categories
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Admin views (requires an ADMIN account)
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Daily promotional popup
    Popup {
        #[command(subcommand)]
        action: commands::popup::PopupAction,
    },
    /// UI locale preference
    Locale {
        #[command(subcommand)]
        action: commands::locale::LocaleAction,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> commands::Result {
    let config = StorefrontConfig::from_env()?;
    let shop = Shopfront::from_config(&config)?;

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&shop, action).await,
        Commands::Cart { action } => commands::cart::run(&shop, action).await,
        Commands::Wishlist { action } => commands::wishlist::run(&shop, action).await,
        Commands::Orders { action } => commands::orders::run(&shop, action).await,
        Commands::Catalog { action } => commands::catalog::run(&shop, action).await,
        Commands::Admin { action } => commands::admin::run(&shop, action).await,
        Commands::Popup { action } => commands::popup::run(&shop, action),
        Commands::Locale { action } => commands::locale::run(&shop, action),
    }
}
