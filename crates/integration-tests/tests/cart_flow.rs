//! Cart mutations and checkout arithmetic against the mock API.

use shopfront_core::{Money, NewCartItem, ProductId};
use shopfront_integration_tests::TestContext;
use shopfront_storefront::Shopfront;
use shopfront_storefront::auth::LoginCredentials;
use shopfront_storefront::cart::CartError;

async fn signed_in() -> (TestContext, Shopfront) {
    let ctx = TestContext::start().await.expect("Failed to start mock API");
    let shop = ctx.shop().expect("Failed to build client");
    shop.auth
        .login(&LoginCredentials::new("john@shop.com", "john-pass"))
        .await
        .expect("Login failed");
    (ctx, shop)
}

fn assert_subtotal_matches_lines(shop: &Shopfront) {
    let state = shop.cart.state();
    let expected: Money = state.items.iter().map(|i| i.line_total()).sum();
    assert_eq!(state.subtotal(), expected);
}

#[tokio::test]
async fn test_cart_summary_for_two_lines() {
    let (_ctx, shop) = signed_in().await;
    shop.cart.fetch().await.expect("Fetch failed");

    shop.cart
        .add(&NewCartItem::new(ProductId::new("tee"), 2))
        .await
        .expect("Add tee failed");
    shop.cart
        .add(&NewCartItem::new(ProductId::new("cap"), 1))
        .await
        .expect("Add cap failed");

    let summary = shop.cart.summary();
    assert_eq!(summary.subtotal, Money::from_cents(5500));
    assert_eq!(summary.shipping, Money::from_cents(1000));
    assert_eq!(summary.tax, Money::from_cents(550));
    assert_eq!(summary.total, Money::from_cents(7050));
    assert_subtotal_matches_lines(&shop);
}

#[tokio::test]
async fn test_mutations_keep_subtotal_consistent() {
    let (_ctx, shop) = signed_in().await;
    shop.cart.fetch().await.expect("Fetch failed");

    let tee = shop
        .cart
        .add(&NewCartItem::new(ProductId::new("tee"), 1).with_size("M"))
        .await
        .expect("Add failed");
    assert_subtotal_matches_lines(&shop);

    // same variant merges server-side into the same line
    let merged = shop
        .cart
        .add(&NewCartItem::new(ProductId::new("tee"), 2).with_size("M"))
        .await
        .expect("Merge failed");
    assert_eq!(merged.id, tee.id);
    assert_eq!(shop.cart.state().item_count(), 1);
    assert_subtotal_matches_lines(&shop);

    shop.cart
        .update_quantity(&tee.id, 5)
        .await
        .expect("Update failed");
    assert_eq!(shop.cart.state().subtotal(), Money::from_cents(10_000));
    assert!(shop.cart.summary().has_free_shipping());

    shop.cart.remove(&tee.id).await.expect("Remove failed");
    assert!(shop.cart.state().is_empty());
    assert_subtotal_matches_lines(&shop);
}

#[tokio::test]
async fn test_over_stock_is_refused_before_sending() {
    let (_ctx, shop) = signed_in().await;
    shop.cart.fetch().await.expect("Fetch failed");
    let cap = shop
        .cart
        .add(&NewCartItem::new(ProductId::new("cap"), 2))
        .await
        .expect("Add failed");

    let err = shop
        .cart
        .update_quantity(&cap.id, 4)
        .await
        .expect_err("Update should be refused");
    assert!(matches!(
        err,
        CartError::ExceedsStock {
            requested: 4,
            available: 3
        }
    ));
    assert_eq!(shop.cart.state().items[0].quantity, 2);
}

#[tokio::test]
async fn test_clear_twice_and_refetch() {
    let (_ctx, shop) = signed_in().await;
    shop.cart
        .add(&NewCartItem::new(ProductId::new("tee"), 1))
        .await
        .expect("Add failed");

    shop.cart.clear().await.expect("First clear failed");
    let first = shop.cart.state();
    shop.cart.clear().await.expect("Second clear failed");
    assert_eq!(shop.cart.state(), first);

    let server = shop.cart.fetch().await.expect("Fetch failed");
    assert!(server.is_empty());
}
