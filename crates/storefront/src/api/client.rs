//! `ApiClient` implementation.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{COOKIE, RETRY_AFTER, SET_COOKIE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use glowishii_core::{
    Address, AddressId, Cart, CartLine, Credentials, Email, NewOrder, Order, OrderId, OrderStatus,
    OtpCode, Product, ProductDraft, ProductId, SignupDraft, User,
};

use super::cache::{CacheKey, CacheValue};
use super::wire::{
    AddressBody, AddressesBody, CartBody, ErrorBody, LoginBody, PincodeInfo, ProductRef,
    SendOtpBody, StatusBody, VerifyOtpBody,
};
use super::{ApiError, ApiSession};
use crate::config::ApiConfig;

/// Longest body excerpt written to logs.
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the shop API.
///
/// Cheap to clone. Catalog reads are cached; admin product writes flush the
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("glowishii-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments (each one percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.get(self.endpoint(segments)?))
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.post(self.endpoint(segments)?))
    }

    fn patch(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.patch(self.endpoint(segments)?))
    }

    fn delete(&self, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.delete(self.endpoint(segments)?))
    }

    /// Send a request and map non-success statuses to [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(message)),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(if message.is_empty() {
                url
            } else {
                message
            })),
            _ => {
                if status.is_server_error() {
                    tracing::error!(
                        status = %status,
                        path = %url,
                        body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                        "Shop API returned server error"
                    );
                }
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Send a request and decode the JSON response.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse shop API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request, ignoring the response body.
    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(drop)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.send_json(self.get(&["products"])?).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .send_json(self.get(&["products", id.as_str()])?)
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the featured ("special") products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Featured).await
        {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let products: Vec<Product> = self.send_json(self.get(&["specialProducts"])?).await?;

        self.inner
            .cache
            .insert(CacheKey::Featured, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    #[instrument(skip(self, session, draft), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        session: &ApiSession,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let request = authed(self.post(&["products"])?, session).json(draft);
        let product = self.send_json(request).await?;
        self.invalidate_catalog();
        Ok(product)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update or the request fails.
    #[instrument(skip(self, session, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        session: &ApiSession,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let request = authed(self.patch(&["products", id.as_str()])?, session).json(draft);
        let product = self.send_json(request).await?;
        self.invalidate_catalog();
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %id))]
    pub async fn delete_product(&self, session: &ApiSession, id: &ProductId) -> Result<(), ApiError> {
        let request = authed(self.delete(&["products", id.as_str()])?, session);
        self.send_empty(request).await?;
        self.invalidate_catalog();
        Ok(())
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get the signed-in user's cart as a ledger.
    ///
    /// Items that reference a product by id are resolved through
    /// [`Self::get_product`]; items whose product no longer exists are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn get_cart(&self, session: &ApiSession) -> Result<Cart, ApiError> {
        let body: CartBody = self.send_json(authed(self.get(&["cart"])?, session)).await?;

        let mut lines = Vec::with_capacity(body.items.len());
        for item in body.items {
            let product = match item.product {
                ProductRef::Populated(product) => *product,
                ProductRef::Id(id) => match self.get_product(&id).await {
                    Ok(product) => product,
                    Err(ApiError::NotFound(_)) => {
                        warn!(product_id = %id, "Cart references a missing product");
                        continue;
                    }
                    Err(e) => return Err(e),
                },
            };
            lines.push(CartLine::new(&product, item.quantity));
        }

        Ok(Cart::from_lines(lines))
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change or the request fails.
    #[instrument(skip(self, session), fields(product_id = %id))]
    pub async fn add_to_cart(&self, session: &ApiSession, id: &ProductId) -> Result<(), ApiError> {
        let request = authed(self.post(&["cart", id.as_str()])?, session)
            .json(&serde_json::json!({ "itemID": id }));
        self.send_empty(request).await
    }

    /// Remove one unit of a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change or the request fails.
    #[instrument(skip(self, session), fields(product_id = %id))]
    pub async fn remove_one_from_cart(
        &self,
        session: &ApiSession,
        id: &ProductId,
    ) -> Result<(), ApiError> {
        let request = authed(self.patch(&["cart", id.as_str()])?, session)
            .json(&serde_json::json!({ "itemID": id }));
        self.send_empty(request).await
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change or the request fails.
    #[instrument(skip(self, session), fields(product_id = %id))]
    pub async fn remove_from_cart(&self, session: &ApiSession, id: &ProductId) -> Result<(), ApiError> {
        let request = authed(self.delete(&["cart", id.as_str()])?, session);
        self.send_empty(request).await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Every order in the shop (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn all_orders(&self, session: &ApiSession) -> Result<Vec<Order>, ApiError> {
        self.send_json(authed(self.get(&["allOrders"])?, session))
            .await
    }

    /// The signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn my_orders(&self, session: &ApiSession) -> Result<Vec<Order>, ApiError> {
        self.send_json(authed(self.get(&["orders"])?, session)).await
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist, or an error
    /// if the API request fails.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn get_order(&self, session: &ApiSession, id: &OrderId) -> Result<Order, ApiError> {
        self.send_json(authed(self.get(&["orders", id.as_str()])?, session))
            .await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the request fails.
    #[instrument(skip(self, session, order), fields(items = order.items.len(), total = %order.total_amount))]
    pub async fn place_order(&self, session: &ApiSession, order: &NewOrder) -> Result<Order, ApiError> {
        let request = authed(self.post(&["order"])?, session).json(order);
        self.send_json(request).await
    }

    /// Change an order's status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change or the request fails.
    #[instrument(skip(self, session), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        session: &ApiSession,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let request =
            authed(self.patch(&["orders", id.as_str()])?, session).json(&StatusBody { status });
        self.send_json(request).await
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Sign in, returning the user and the API session cookie.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` (or a 4xx `Status`) for bad
    /// credentials, `ApiError::MissingSession` if no cookie came back.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(User, ApiSession), ApiError> {
        let response = self.send(self.post(&["login"])?.json(credentials)).await?;

        let session = ApiSession::from_set_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        )
        .ok_or(ApiError::MissingSession)?;

        let text = response.text().await?;
        let body: LoginBody = serde_json::from_str(&text)?;
        Ok((body.user, session))
    }

    /// Create an account. The API emails a verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the signup or the request fails.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn signup(&self, draft: &SignupDraft) -> Result<(), ApiError> {
        self.send_empty(self.post(&["signup"])?.json(draft)).await
    }

    /// Verify an email address with the code that was sent to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is wrong or expired, or the request fails.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_otp(&self, email: &Email, otp: &OtpCode) -> Result<(), ApiError> {
        let body = VerifyOtpBody {
            email,
            otp: otp.as_str(),
        };
        self.send_empty(self.post(&["otp", "verify"])?.json(&body))
            .await
    }

    /// Send a fresh verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn send_otp(&self, email: &Email) -> Result<(), ApiError> {
        self.send_empty(self.post(&["otp", "send"])?.json(&SendOtpBody { email }))
            .await
    }

    /// The user behind an API session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session has expired.
    #[instrument(skip(self, session))]
    pub async fn me(&self, session: &ApiSession) -> Result<User, ApiError> {
        self.send_json(authed(self.get(&["me"])?, session)).await
    }

    /// End the API session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn logout(&self, session: &ApiSession) -> Result<(), ApiError> {
        self.send_empty(authed(self.post(&["logout"])?, session))
            .await
    }

    /// Save a new address, returning the full address list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, session, address))]
    pub async fn add_address(
        &self,
        session: &ApiSession,
        address: &Address,
    ) -> Result<Vec<Address>, ApiError> {
        let request = authed(self.post(&["address"])?, session).json(&AddressBody::from(address));
        let body: AddressesBody = self.send_json(request).await?;
        Ok(body.addresses)
    }

    /// Update an address, returning the full address list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, session, address), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        session: &ApiSession,
        id: &AddressId,
        address: &Address,
    ) -> Result<Vec<Address>, ApiError> {
        let request = authed(self.patch(&["address", id.as_str()])?, session)
            .json(&AddressBody::from(address));
        let body: AddressesBody = self.send_json(request).await?;
        Ok(body.addresses)
    }

    /// Delete an address, returning the remaining addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(address_id = %id))]
    pub async fn delete_address(
        &self,
        session: &ApiSession,
        id: &AddressId,
    ) -> Result<Vec<Address>, ApiError> {
        let request = authed(self.delete(&["address", id.as_str()])?, session);
        let body: AddressesBody = self.send_json(request).await?;
        Ok(body.addresses)
    }

    /// Look up the city and state for a six digit pincode.
    ///
    /// Returns `Ok(None)` when the API knows no match.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn lookup_pincode(&self, pincode: &str) -> Result<Option<PincodeInfo>, ApiError> {
        match self
            .send_json::<Vec<PincodeInfo>>(self.get(&["pincode", pincode])?)
            .await
        {
            Ok(matches) => Ok(matches.into_iter().next()),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check that the API answers at all (readiness probe).
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or failing.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.send_empty(self.get(&["specialProducts"])?).await
    }
}

/// Attach the visitor's API session cookie.
fn authed(request: RequestBuilder, session: &ApiSession) -> RequestBuilder {
    request.header(COOKIE, session.cookie_header())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use glowishii_core::{Price, ProductForm};
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone, Default)]
    struct Hits {
        products: Arc<AtomicUsize>,
    }

    fn product_json(id: &str, name: &str, price: u32) -> Value {
        json!({ "_id": id, "name": name, "category": "Jar", "price": price, "special": true })
    }

    async fn serve(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
        ApiClient::new(&ApiConfig::new(base)).unwrap()
    }

    fn fake_api(hits: Hits) -> Router {
        Router::new()
            .route(
                "/api/products",
                get(|State(hits): State<Hits>| async move {
                    hits.products.fetch_add(1, Ordering::SeqCst);
                    Json(json!([product_json("p1", "Amber", 500)]))
                })
                .post(|| async { Json(product_json("p9", "New", 100)) }),
            )
            .route(
                "/api/products/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "p2" {
                        Json(product_json("p2", "Rose", 250)).into_response()
                    } else {
                        (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })))
                            .into_response()
                    }
                }),
            )
            .route(
                "/api/cart",
                get(|headers: HeaderMap| async move {
                    if headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) != Some("token=t1")
                    {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }
                    Json(json!({
                        "cartTotal": 999,
                        "items": [
                            { "product": product_json("p1", "Amber", 500), "quantity": 2, "itemsTotal": 1 },
                            { "product": "p2", "quantity": 1 },
                            { "product": "gone", "quantity": 4 }
                        ]
                    }))
                    .into_response()
                }),
            )
            .route(
                "/api/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] != "correct-horse" {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "message": "Invalid credentials" })),
                        )
                            .into_response();
                    }
                    (
                        [(header::SET_COOKIE, "token=t1; Path=/; HttpOnly")],
                        Json(json!({ "user": {
                            "_id": "u1", "name": "Asha", "email": body["email"], "isAdmin": false
                        }})),
                    )
                        .into_response()
                }),
            )
            .route(
                "/api/pincode/{code}",
                get(|Path(code): Path<String>| async move {
                    if code == "560001" {
                        Json(json!([{ "city": "Bengaluru", "state": "Karnataka" }]))
                    } else {
                        Json(json!([]))
                    }
                }),
            )
            .route(
                "/api/specialProducts",
                get(|| async { (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "7")]) }),
            )
            .with_state(hits)
    }

    #[tokio::test]
    async fn test_list_products_is_cached_until_write() {
        let hits = Hits::default();
        let client = serve(fake_api(hits.clone())).await;

        let first = client.list_products().await.unwrap();
        let second = client.list_products().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(hits.products.load(Ordering::SeqCst), 1);

        let draft = ProductForm {
            name: "New".to_string(),
            category: "Jar".to_string(),
            description: "d".to_string(),
            price: "100".to_string(),
            size: "100g".to_string(),
            images: "https://cdn.example/n.jpg".to_string(),
            ..ProductForm::default()
        }
        .validate()
        .unwrap();
        let created = client
            .create_product(&ApiSession::new("token=t1"), &draft)
            .await
            .unwrap();
        assert_eq!(created.id.as_str(), "p9");

        client.list_products().await.unwrap();
        assert_eq!(hits.products.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_product_not_found_carries_message() {
        let client = serve(fake_api(Hits::default())).await;
        let err = client.get_product(&ProductId::new("nope")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Product not found"));
    }

    #[tokio::test]
    async fn test_get_cart_resolves_ids_and_recomputes_totals() {
        let client = serve(fake_api(Hits::default())).await;
        let cart = client.get_cart(&ApiSession::new("token=t1")).await.unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::from_rupees(1250));
    }

    #[tokio::test]
    async fn test_get_cart_without_session_is_unauthorized() {
        let client = serve(fake_api(Hits::default())).await;
        let err = client.get_cart(&ApiSession::new("token=bad")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_captures_session_cookie() {
        let client = serve(fake_api(Hits::default())).await;
        let credentials = Credentials::parse("asha@example.in", "correct-horse").unwrap();
        let (user, session) = client.login(&credentials).await.unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(session.cookie_header(), "token=t1");

        let wrong = Credentials::parse("asha@example.in", "nope").unwrap();
        let err = client.login(&wrong).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_lookup_pincode() {
        let client = serve(fake_api(Hits::default())).await;
        let info = client.lookup_pincode("560001").await.unwrap().unwrap();
        assert_eq!(info.city, "Bengaluru");
        assert!(client.lookup_pincode("999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let client = serve(fake_api(Hits::default())).await;
        let err = client.featured_products().await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(7)));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            ApiClient::new(&ApiConfig::new(Url::parse("http://localhost/api/").unwrap())).unwrap();
        let url = client.endpoint(&["products", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/products/a%2Fb%20c");
    }
}
