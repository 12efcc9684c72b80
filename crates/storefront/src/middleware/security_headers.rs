//! Response headers that confine what a storefront page may load or do.
//!
//! Pages only ever pull scripts, styles and fonts from `/static`, and the
//! address script only talks to `/api/pincode`. Product photos are the one
//! exception: admins paste image URLs from any HTTPS host into the product
//! form, so images (and nothing else) may come from off-site.

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{CACHE_CONTROL, CONTENT_SECURITY_POLICY},
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy for every HTML page.
///
/// `form-action 'self'` keeps the login, checkout and admin forms posting
/// back to this origin even if markup is injected into a product description.
const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' https: data:; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'none'; \
     form-action 'self'; \
     frame-ancestors 'none'; \
     upgrade-insecure-requests";

/// Browser features the shop never uses.
const PERMISSIONS_POLICY_VALUE: &str =
    "camera=(), microphone=(), geolocation=(), payment=(), usb=(), interest-cohort=()";

/// Headers set on every response regardless of what the handler sent.
const FIXED_HEADERS: [(&str, &str); 6] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "same-origin"),
    ("cross-origin-opener-policy", "same-origin"),
    // Remote product photos arrive without CORP headers.
    ("cross-origin-embedder-policy", "credentialless"),
    ("permissions-policy", PERMISSIONS_POLICY_VALUE),
];

/// Apply the storefront's security headers.
///
/// Pages carry the visitor's name, cart and orders, so responses default to
/// `no-store`. Handlers or services that already chose a `Cache-Control`
/// (the hashed `/static` assets) keep theirs.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply(response.headers_mut());
    response
}

fn apply(headers: &mut HeaderMap) {
    for (name, value) in FIXED_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{
            Request,
            header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        },
        middleware,
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "page" }))
            .route(
                "/asset",
                get(|| async {
                    (
                        [(CACHE_CONTROL, "public, max-age=31536000, immutable")],
                        "body{}",
                    )
                        .into_response()
                }),
            )
            .layer(middleware::from_fn(security_headers_middleware))
    }

    async fn headers_for(uri: &str) -> HeaderMap {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_pages_allow_remote_images_but_only_local_scripts() {
        let headers = headers_for("/").await;

        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("img-src 'self' https: data:"));
        assert!(csp.contains("script-src 'self';"));
        assert!(csp.contains("connect-src 'self';"));
        assert!(csp.contains("form-action 'self'"));
        assert_eq!(
            headers.get("cross-origin-embedder-policy").unwrap(),
            "credentialless"
        );
    }

    #[tokio::test]
    async fn test_pages_are_not_stored() {
        let headers = headers_for("/").await;
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_existing_cache_control_is_kept() {
        let headers = headers_for("/asset").await;
        assert_eq!(
            headers.get(CACHE_CONTROL).unwrap(),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }
}
