//! In-process stand-in for the GLOWISHII shop API.
//!
//! Speaks the same JSON as the real API for the endpoints the storefront
//! calls. The API session cookie is `token=<user id>`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};

pub const CUSTOMER_ID: &str = "u1";
pub const CUSTOMER_EMAIL: &str = "asha@glowishii.test";
pub const ADMIN_EMAIL: &str = "meera@glowishii.test";
pub const PASSWORD: &str = "correct-horse";
pub const VALID_OTP: &str = "123456";
pub const SAVED_ADDRESS_ID: &str = "a1";

struct Account {
    id: String,
    name: String,
    email: String,
    is_admin: bool,
    verified: bool,
    addresses: Vec<Value>,
}

impl Account {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "name": self.name,
            "email": self.email,
            "verified": self.verified,
            "isAdmin": self.is_admin,
            "address": self.addresses,
        })
    }
}

#[derive(Default)]
struct ShopData {
    products: Vec<Value>,
    accounts: Vec<Account>,
    carts: HashMap<String, Vec<(String, u32)>>,
    orders: Vec<Value>,
    sequence: u32,
}

impl ShopData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{prefix}{:020}", self.sequence)
    }

    fn product(&self, id: &str) -> Option<&Value> {
        self.products.iter().find(|p| p["_id"] == id)
    }

    fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }
}

/// Shared handle on the fake shop's data.
#[derive(Clone)]
pub struct FakeShop {
    data: Arc<Mutex<ShopData>>,
}

fn candle(id: &str, name: &str, category: &str, price: u32, discounted: Option<u32>) -> Value {
    json!({
        "_id": id,
        "name": name,
        "category": category,
        "description": format!("{name}, hand-poured in soy wax."),
        "price": price,
        "discountedPrice": discounted,
        "size": "200g",
        "burnTime": 40,
        "ingredients": ["Soy wax", "Cotton wick"],
        "fragrances": [name.split_whitespace().next().unwrap_or(name)],
        "images": [format!("https://img.glowishii.test/{id}.jpg")],
        "inStock": true,
        "special": false,
        "avgRating": 4.2,
        "reviews": [],
    })
}

impl FakeShop {
    /// Three candles, one customer with a saved address, one admin.
    #[must_use]
    pub fn seeded() -> Self {
        let mut amber = candle("p1", "Amber Glow", "Jar", 500, Some(450));
        amber["special"] = json!(true);
        let lavender = candle("p2", "Lavender Dream", "Pillar", 300, None);
        let mut rose = candle("p3", "Sold Out Rose", "Jar", 400, None);
        rose["inStock"] = json!(false);

        let data = ShopData {
            products: vec![amber, lavender, rose],
            accounts: vec![
                Account {
                    id: CUSTOMER_ID.to_string(),
                    name: "Asha Rao".to_string(),
                    email: CUSTOMER_EMAIL.to_string(),
                    is_admin: false,
                    verified: true,
                    addresses: vec![json!({
                        "_id": SAVED_ADDRESS_ID,
                        "name": "Asha Rao",
                        "street": "12 MG Road",
                        "city": "Bengaluru",
                        "state": "Karnataka",
                        "pincode": "560001",
                        "country": "India",
                        "phone": "9845012345",
                    })],
                },
                Account {
                    id: "u9".to_string(),
                    name: "Meera Iyer".to_string(),
                    email: ADMIN_EMAIL.to_string(),
                    is_admin: true,
                    verified: true,
                    addresses: Vec::new(),
                },
            ],
            ..ShopData::default()
        };
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShopData> {
        self.data.lock().expect("fake shop lock poisoned")
    }

    /// Units of a product in a user's server-side cart.
    #[must_use]
    pub fn cart_quantity(&self, user_id: &str, product_id: &str) -> u32 {
        self.lock()
            .carts
            .get(user_id)
            .and_then(|lines| lines.iter().find(|(id, _)| id == product_id))
            .map_or(0, |(_, quantity)| *quantity)
    }

    /// Current status of an order.
    #[must_use]
    pub fn order_status(&self, order_id: &str) -> Option<String> {
        self.lock()
            .orders
            .iter()
            .find(|o| o["_id"] == order_id)
            .and_then(|o| o["orderStatus"].as_str().map(str::to_string))
    }

    /// Ids of every order, oldest first.
    #[must_use]
    pub fn order_ids(&self) -> Vec<String> {
        self.lock()
            .orders
            .iter()
            .filter_map(|o| o["_id"].as_str().map(str::to_string))
            .collect()
    }

    /// Insert an order for the seeded customer with the given status.
    #[must_use]
    pub fn seed_order(&self, status: &str) -> String {
        let mut data = self.lock();
        let id = data.next_id("ord");
        let order = json!({
            "_id": id,
            "userId": CUSTOMER_ID,
            "items": [{ "productId": "p2", "name": "Lavender Dream", "quantity": 2, "price": 300 }],
            "shippingAddress": {
                "name": "Asha Rao", "street": "12 MG Road", "city": "Bengaluru",
                "state": "Karnataka", "pincode": "560001", "country": "India", "phone": "9845012345"
            },
            "payment": { "method": "COD", "status": "Pending" },
            "orderStatus": status,
            "itemsTotal": 600,
            "deliveryCharges": 0,
            "totalAmount": 600,
            "createdAt": "2026-10-01T09:30:00Z",
        });
        data.orders.push(order);
        id
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// User id from the `token=<id>` API cookie.
fn caller(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix("token="))
        .map(str::to_string)
}

macro_rules! signed_in {
    ($headers:expr) => {
        match caller(&$headers) {
            Some(id) => id,
            None => return message(StatusCode::UNAUTHORIZED, "Please log in"),
        }
    };
}

/// Build the fake API router, mounted under `/api`.
pub fn router(shop: FakeShop) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/api/specialProducts", get(special_products))
        .route("/api/cart", get(get_cart))
        .route(
            "/api/cart/{id}",
            post(cart_add).patch(cart_remove_one).delete(cart_remove_line),
        )
        .route("/api/login", post(login))
        .route("/api/logout", post(|| async { StatusCode::OK }))
        .route("/api/signup", post(signup))
        .route("/api/otp/verify", post(verify_otp))
        .route("/api/otp/send", post(|| async { StatusCode::OK }))
        .route("/api/me", get(me))
        .route("/api/address", post(add_address))
        .route("/api/address/{id}", patch(update_address).delete(delete_address))
        .route("/api/order", post(place_order))
        .route("/api/orders", get(my_orders))
        .route("/api/orders/{id}", get(get_order).patch(update_order))
        .route("/api/allOrders", get(all_orders))
        .route("/api/pincode/{code}", get(pincode))
        .with_state(shop)
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(State(shop): State<FakeShop>) -> Json<Value> {
    Json(json!(shop.lock().products))
}

async fn special_products(State(shop): State<FakeShop>) -> Json<Value> {
    let data = shop.lock();
    let special: Vec<&Value> = data.products.iter().filter(|p| p["special"] == true).collect();
    Json(json!(special))
}

async fn get_product(State(shop): State<FakeShop>, Path(id): Path<String>) -> Response {
    match shop.lock().product(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn create_product(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let _user = signed_in!(headers);
    let mut data = shop.lock();
    body["_id"] = json!(data.next_id("prd"));
    data.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let _user = signed_in!(headers);
    let mut data = shop.lock();
    let Some(product) = data.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    if let (Some(target), Some(fields)) = (product.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(product.clone()).into_response()
}

async fn delete_product(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let _user = signed_in!(headers);
    shop.lock().products.retain(|p| p["_id"] != id.as_str());
    StatusCode::OK.into_response()
}

// =============================================================================
// Cart
// =============================================================================

async fn get_cart(State(shop): State<FakeShop>, headers: HeaderMap) -> Response {
    let user = signed_in!(headers);
    let data = shop.lock();
    let items: Vec<Value> = data
        .carts
        .get(&user)
        .map(|lines| {
            lines
                .iter()
                .enumerate()
                .map(|(i, (id, quantity))| {
                    // Alternate populated and bare ids, as the real API does
                    // depending on the endpoint that last touched the cart.
                    let product = if i % 2 == 0 {
                        data.product(id).cloned().unwrap_or_else(|| json!(id))
                    } else {
                        json!(id)
                    };
                    json!({ "product": product, "quantity": quantity })
                })
                .collect()
        })
        .unwrap_or_default();
    Json(json!({ "items": items })).into_response()
}

async fn cart_add(State(shop): State<FakeShop>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    match data.product(&id) {
        None => return message(StatusCode::NOT_FOUND, "Product not found"),
        Some(product) if product["inStock"] == false => {
            return message(StatusCode::BAD_REQUEST, "Product is out of stock");
        }
        Some(_) => {}
    }
    let lines = data.carts.entry(user).or_default();
    match lines.iter_mut().find(|(line, _)| *line == id) {
        Some((_, quantity)) => *quantity += 1,
        None => lines.push((id, 1)),
    }
    StatusCode::OK.into_response()
}

async fn cart_remove_one(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    let lines = data.carts.entry(user).or_default();
    if let Some((_, quantity)) = lines.iter_mut().find(|(line, _)| *line == id) {
        *quantity = quantity.saturating_sub(1);
    }
    lines.retain(|(_, quantity)| *quantity > 0);
    StatusCode::OK.into_response()
}

async fn cart_remove_line(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user = signed_in!(headers);
    shop.lock()
        .carts
        .entry(user)
        .or_default()
        .retain(|(line, _)| *line != id);
    StatusCode::OK.into_response()
}

// =============================================================================
// Accounts
// =============================================================================

async fn login(State(shop): State<FakeShop>, Json(body): Json<Value>) -> Response {
    let data = shop.lock();
    let account = data.accounts.iter().find(|a| body["email"] == a.email.as_str());
    match account {
        Some(account) if body["password"] == PASSWORD => (
            [(header::SET_COOKIE, format!("token={}; Path=/; HttpOnly", account.id))],
            Json(json!({ "user": account.to_json() })),
        )
            .into_response(),
        _ => message(StatusCode::BAD_REQUEST, "Invalid credentials"),
    }
}

async fn signup(State(shop): State<FakeShop>, Json(body): Json<Value>) -> Response {
    let mut data = shop.lock();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if data.accounts.iter().any(|a| a.email == email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    let id = data.next_id("usr");
    data.accounts.push(Account {
        id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        is_admin: false,
        verified: false,
        addresses: Vec::new(),
    });
    StatusCode::CREATED.into_response()
}

async fn verify_otp(State(shop): State<FakeShop>, Json(body): Json<Value>) -> Response {
    if body["otp"] != VALID_OTP {
        return message(StatusCode::BAD_REQUEST, "Invalid OTP");
    }
    let mut data = shop.lock();
    if let Some(account) = data.accounts.iter_mut().find(|a| body["email"] == a.email.as_str()) {
        account.verified = true;
    }
    StatusCode::OK.into_response()
}

async fn me(State(shop): State<FakeShop>, headers: HeaderMap) -> Response {
    let user = signed_in!(headers);
    match shop.lock().account_mut(&user) {
        Some(account) => Json(account.to_json()).into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Please log in"),
    }
}

async fn add_address(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    body["_id"] = json!(data.next_id("adr"));
    match data.account_mut(&user) {
        Some(account) => {
            account.addresses.push(body);
            Json(json!({ "addresses": account.addresses })).into_response()
        }
        None => message(StatusCode::UNAUTHORIZED, "Please log in"),
    }
}

async fn update_address(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    let Some(account) = data.account_mut(&user) else {
        return message(StatusCode::UNAUTHORIZED, "Please log in");
    };
    let Some(address) = account.addresses.iter_mut().find(|a| a["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Address not found");
    };
    body["_id"] = json!(id);
    *address = body;
    Json(json!({ "addresses": account.addresses })).into_response()
}

async fn delete_address(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    let Some(account) = data.account_mut(&user) else {
        return message(StatusCode::UNAUTHORIZED, "Please log in");
    };
    account.addresses.retain(|a| a["_id"] != id.as_str());
    Json(json!({ "addresses": account.addresses })).into_response()
}

// =============================================================================
// Orders
// =============================================================================

async fn place_order(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let user = signed_in!(headers);
    let mut data = shop.lock();
    let id = data.next_id("ord");
    body["_id"] = json!(id);
    body["userId"] = json!(user);
    body["orderStatus"] = json!("Placed");
    body["createdAt"] = json!("2026-10-16T10:00:00Z");
    data.orders.push(body.clone());
    data.carts.remove(&user);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn my_orders(State(shop): State<FakeShop>, headers: HeaderMap) -> Response {
    let user = signed_in!(headers);
    let data = shop.lock();
    let mine: Vec<&Value> = data.orders.iter().filter(|o| o["userId"] == user.as_str()).collect();
    Json(json!(mine)).into_response()
}

async fn all_orders(State(shop): State<FakeShop>, headers: HeaderMap) -> Response {
    let user = signed_in!(headers);
    let data = shop.lock();
    if !data.accounts.iter().any(|a| a.id == user && a.is_admin) {
        return message(StatusCode::FORBIDDEN, "Admins only");
    }
    Json(json!(data.orders)).into_response()
}

async fn get_order(State(shop): State<FakeShop>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let _user = signed_in!(headers);
    match shop.lock().orders.iter().find(|o| o["_id"] == id.as_str()) {
        Some(order) => Json(order.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn update_order(
    State(shop): State<FakeShop>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let _user = signed_in!(headers);
    let mut data = shop.lock();
    match data.orders.iter_mut().find(|o| o["_id"] == id.as_str()) {
        Some(order) => {
            order["orderStatus"] = body["status"].clone();
            Json(order.clone()).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn pincode(Path(code): Path<String>) -> Json<Value> {
    if code == "560001" {
        Json(json!([{ "city": "Bengaluru", "state": "Karnataka" }]))
    } else {
        Json(json!([]))
    }
}
