//! In-memory mock of the storefront JSON API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use shopfront_core::{
    CartItem, CartItemId, Money, Order, OrderCustomer, OrderId, OrderItem, OrderStatus,
    PaymentStatus, Product, ProductId, ProductSummary, Role, User, UserId,
};

/// Request counters for assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub refresh_calls: usize,
    pub logout_calls: usize,
    pub unauthorized_responses: usize,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct ServerState {
    accounts: Vec<Account>,
    products: Vec<Product>,
    orders: Vec<Order>,
    carts: HashMap<UserId, Vec<CartItem>>,
    access_tokens: HashMap<String, UserId>,
    refresh_tokens: HashMap<String, UserId>,
    rejected_statuses: Vec<OrderStatus>,
    stats: ServerStats,
}

type Shared = Arc<Mutex<ServerState>>;

/// Handle to a running mock API. The server stops with the test runtime.
#[derive(Clone)]
pub struct MockApi {
    addr: SocketAddr,
    state: Shared,
}

impl MockApi {
    /// Bind `127.0.0.1:0`, seed, and serve in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state: Shared = Arc::new(Mutex::new(seed()));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = router(state.clone());
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock API stopped");
            }
        });

        Ok(Self { addr, state })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn stats(&self) -> ServerStats {
        self.state.lock().stats
    }

    /// Invalidate every issued access token, so the next request gets a 401.
    pub fn expire_access_tokens(&self) {
        self.state.lock().access_tokens.clear();
    }

    /// Invalidate every refresh token as well.
    pub fn revoke_sessions(&self) {
        let mut state = self.state.lock();
        state.access_tokens.clear();
        state.refresh_tokens.clear();
    }

    /// Make `PATCH /admin/orders/:id` refuse transitions to `status`.
    pub fn reject_status(&self, status: OrderStatus) {
        self.state.lock().rejected_statuses.push(status);
    }

    /// A user's role as the server sees it.
    #[must_use]
    pub fn role_of(&self, email: &str) -> Option<Role> {
        self.state
            .lock()
            .accounts
            .iter()
            .find(|a| a.user.email == email)
            .map(|a| a.user.role)
    }

    /// An order's status as the server sees it.
    #[must_use]
    pub fn status_of(&self, id: &str) -> Option<OrderStatus> {
        self.state
            .lock()
            .orders
            .iter()
            .find(|o| o.id.as_str() == id)
            .map(|o| o.status)
    }
}

// =============================================================================
// Seed data
// =============================================================================

fn account(id: &str, name: &str, email: &str, password: &str, role: Role) -> Account {
    Account {
        user: User {
            id: UserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            role,
            is_verified: true,
            created_at: None,
        },
        password: password.to_string(),
    }
}

fn product(id: &str, name: &str, cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        slug: id.to_string(),
        description: None,
        price: Money::from_cents(cents),
        compare_price: None,
        stock,
        images: Vec::new(),
        category: None,
        colors: Vec::new(),
        sizes: Vec::new(),
    }
}

fn order(id: &str, number: &str, customer: &Account, status: OrderStatus) -> Order {
    Order {
        id: OrderId::new(id),
        order_number: number.to_string(),
        user_id: customer.user.id.clone(),
        user: Some(OrderCustomer {
            name: customer.user.name.clone(),
            email: customer.user.email.clone(),
        }),
        items: vec![OrderItem {
            product_id: ProductId::new("tee"),
            name: "Tee".to_string(),
            price: Money::from_cents(2000),
            quantity: 1,
            color: None,
            size: None,
        }],
        subtotal: Money::from_cents(2000),
        shipping_fee: Money::from_cents(1000),
        tax: Money::from_cents(200),
        total: Money::from_cents(3200),
        status,
        payment_status: PaymentStatus::Paid,
        shipping_address: None,
        created_at: None,
    }
}

fn seed() -> ServerState {
    let accounts = vec![
        account("u1", "Root", "root@shop.com", "root-pass", Role::Admin),
        account("u2", "John Smith", "john@shop.com", "john-pass", Role::User),
        account("u3", "Johnny", "johnny@shop.com", "johnny-pass", Role::Admin),
        account("u4", "Ann", "ann@shop.com", "ann-pass", Role::User),
    ];
    let orders = match (accounts.get(1), accounts.get(3)) {
        (Some(john), Some(ann)) => vec![
            order("o1", "ORD-1001", john, OrderStatus::Pending),
            order("o2", "ORD-1002", ann, OrderStatus::Shipped),
            order("o3", "ORD-1003", john, OrderStatus::Shipped),
        ],
        _ => Vec::new(),
    };
    ServerState {
        accounts,
        products: vec![
            product("tee", "Tee", 2000, 5),
            product("cap", "Cap", 1500, 3),
        ],
        orders,
        ..ServerState::default()
    }
}

// =============================================================================
// Envelope helpers
// =============================================================================

fn ok(status: StatusCode, data: impl serde::Serialize) -> Response {
    (
        status,
        Json(json!({
            "success": true,
            "statusCode": status.as_u16(),
            "message": "OK",
            "data": data,
        })),
    )
        .into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "statusCode": status.as_u16(),
            "message": message,
        })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl ServerState {
    fn issue_tokens(&mut self, user_id: &UserId) -> (String, String) {
        let access = format!("at_{}", Uuid::new_v4());
        let refresh = format!("rt_{}", Uuid::new_v4());
        self.access_tokens.insert(access.clone(), user_id.clone());
        self.refresh_tokens.insert(refresh.clone(), user_id.clone());
        (access, refresh)
    }

    fn caller(&mut self, headers: &HeaderMap) -> Result<User, Response> {
        let user_id = bearer(headers).and_then(|t| self.access_tokens.get(t)).cloned();
        let user = user_id.and_then(|id| {
            self.accounts
                .iter()
                .find(|a| a.user.id == id)
                .map(|a| a.user.clone())
        });
        user.ok_or_else(|| {
            self.stats.unauthorized_responses += 1;
            fail(StatusCode::UNAUTHORIZED, "Invalid or expired token")
        })
    }

    fn admin(&mut self, headers: &HeaderMap) -> Result<User, Response> {
        let user = self.caller(headers)?;
        if user.role == Role::Admin {
            Ok(user)
        } else {
            Err(fail(StatusCode::FORBIDDEN, "Admin access required"))
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/cart", get(cart).post(add_to_cart).delete(clear_cart))
        .route(
            "/api/cart/{id}",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/admin/orders/{id}", patch(admin_set_status))
        .route("/api/admin/users", get(admin_users))
        .route("/api/admin/users/{id}", patch(admin_set_role))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut state = state.lock();
    let user = state
        .accounts
        .iter()
        .find(|a| a.user.email == body.email && a.password == body.password)
        .map(|a| a.user.clone());
    let Some(user) = user else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    let (access, refresh) = state.issue_tokens(&user.id);
    ok(
        StatusCode::OK,
        json!({"user": user, "accessToken": access, "refreshToken": refresh}),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    refresh_token: String,
}

async fn refresh(State(state): State<Shared>, Json(body): Json<RefreshBody>) -> Response {
    let mut state = state.lock();
    state.stats.refresh_calls += 1;
    // rotation: the presented token is single-use
    let Some(user_id) = state.refresh_tokens.remove(&body.refresh_token) else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    };
    let (access, refresh) = state.issue_tokens(&user_id);
    ok(
        StatusCode::OK,
        json!({"accessToken": access, "refreshToken": refresh}),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoutBody {
    #[serde(default)]
    refresh_token: Option<String>,
}

async fn logout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<LogoutBody>,
) -> Response {
    let mut state = state.lock();
    state.stats.logout_calls += 1;
    if let Some(token) = bearer(&headers) {
        state.access_tokens.remove(token);
    }
    if let Some(token) = body.refresh_token {
        state.refresh_tokens.remove(&token);
    }
    ok(StatusCode::OK, Value::Null)
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match state.lock().caller(&headers) {
        Ok(user) => ok(StatusCode::OK, user),
        Err(response) => response,
    }
}

async fn cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    match state.caller(&headers) {
        Ok(user) => {
            let items = state.carts.get(&user.id).cloned().unwrap_or_default();
            ok(StatusCode::OK, json!({"items": items}))
        }
        Err(response) => response,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddBody {
    product_id: ProductId,
    quantity: u32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> Response {
    let mut state = state.lock();
    let user = match state.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let Some(product) = state.products.iter().find(|p| p.id == body.product_id) else {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    };
    let summary = ProductSummary::from(product);
    let stock = product.stock;

    let items = state.carts.entry(user.id).or_default();
    let existing = items.iter_mut().find(|i| {
        i.product_id == body.product_id && i.color == body.color && i.size == body.size
    });
    let item = match existing {
        Some(line) => {
            let quantity = line.quantity + body.quantity;
            if quantity > stock {
                return fail(StatusCode::BAD_REQUEST, "Not enough stock");
            }
            line.quantity = quantity;
            line.clone()
        }
        None => {
            if body.quantity > stock {
                return fail(StatusCode::BAD_REQUEST, "Not enough stock");
            }
            let line = CartItem {
                id: CartItemId::new(format!("ci_{}", Uuid::new_v4().simple())),
                product_id: body.product_id,
                quantity: body.quantity,
                color: body.color,
                size: body.size,
                note: body.note,
                product: summary,
            };
            items.push(line.clone());
            line
        }
    };
    ok(StatusCode::CREATED, item)
}

#[derive(Deserialize)]
struct QuantityBody {
    quantity: u32,
}

async fn update_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<QuantityBody>,
) -> Response {
    let mut state = state.lock();
    let user = match state.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let line = state
        .carts
        .get_mut(&user.id)
        .and_then(|items| items.iter_mut().find(|i| i.id.as_str() == id));
    match line {
        Some(line) => {
            line.quantity = body.quantity;
            ok(StatusCode::OK, line.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "Cart item not found"),
    }
}

async fn remove_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock();
    let user = match state.caller(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let items = state.carts.entry(user.id).or_default();
    let before = items.len();
    items.retain(|i| i.id.as_str() != id);
    if items.len() == before {
        fail(StatusCode::NOT_FOUND, "Cart item not found")
    } else {
        ok(StatusCode::OK, Value::Null)
    }
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    match state.caller(&headers) {
        Ok(user) => {
            state.carts.remove(&user.id);
            ok(StatusCode::OK, Value::Null)
        }
        Err(response) => response,
    }
}

async fn admin_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    match state.admin(&headers) {
        Ok(_) => ok(StatusCode::OK, &state.orders),
        Err(response) => response,
    }
}

async fn admin_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock();
    match state.admin(&headers) {
        Ok(_) => {
            let users: Vec<&User> = state.accounts.iter().map(|a| &a.user).collect();
            ok(StatusCode::OK, users)
        }
        Err(response) => response,
    }
}

#[derive(Deserialize)]
struct StatusBody {
    status: OrderStatus,
}

async fn admin_set_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Response {
    let mut state = state.lock();
    if let Err(response) = state.admin(&headers) {
        return response;
    }
    if state.rejected_statuses.contains(&body.status) {
        return fail(StatusCode::BAD_REQUEST, "Invalid status transition");
    }
    match state.orders.iter_mut().find(|o| o.id.as_str() == id) {
        Some(order) => {
            order.status = body.status;
            ok(StatusCode::OK, order.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "Order not found"),
    }
}

#[derive(Deserialize)]
struct RoleBody {
    role: Role,
}

async fn admin_set_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RoleBody>,
) -> Response {
    let mut state = state.lock();
    if let Err(response) = state.admin(&headers) {
        return response;
    }
    match state.accounts.iter_mut().find(|a| a.user.id.as_str() == id) {
        Some(account) => {
            account.user.role = body.role;
            ok(StatusCode::OK, account.user.clone())
        }
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}
