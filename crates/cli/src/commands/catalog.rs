//! Catalog commands.

use clap::Subcommand;

use shopfront_core::CategoryId;
use shopfront_storefront::Shopfront;
use shopfront_storefront::catalog::{ProductQuery, ProductSort};

use super::{Result, emit};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products
    Products {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// newest, price_asc, price_desc, or name
        #[arg(long, default_value = "newest")]
        sort: ProductSort,
    },
    /// Show a product by slug
    Product { slug: String },
    /// List categories
    Categories,
}

pub async fn run(shop: &Shopfront, action: CatalogAction) -> Result {
    match action {
        CatalogAction::Products {
            page,
            limit,
            category,
            search,
            sort,
        } => {
            let query = ProductQuery {
                page,
                limit,
                category: category.map(CategoryId::new),
                search,
                sort,
            };
            emit(&shop.catalog.products(&query).await?)
        }
        CatalogAction::Product { slug } => emit(&shop.catalog.product(&slug).await?),
        CatalogAction::Categories => emit(&shop.catalog.categories().await?),
    }
}
