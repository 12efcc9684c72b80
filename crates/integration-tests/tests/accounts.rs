//! Integration tests for sign-in, signup with email verification, and the
//! profile's saved addresses.

use glowishii_integration_tests::{CUSTOMER_EMAIL, PASSWORD, TestContext, VALID_OTP, location};
use reqwest::StatusCode;

// ============================================================================
// Login & Logout
// ============================================================================

#[tokio::test]
async fn test_login_with_wrong_password_rerenders_form() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form("/login", &[("email", CUSTOMER_EMAIL), ("password", "wrong-password")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains(CUSTOMER_EMAIL), "email is kept in the form");
}

#[tokio::test]
async fn test_login_with_malformed_email_never_reaches_api() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form("/login", &[("email", "not-an-email"), ("password", PASSWORD)])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Email must contain exactly one @ symbol"));
}

#[tokio::test]
async fn test_login_greets_once_and_shows_account_nav() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;

    let body = ctx.page("/").await;
    assert!(body.contains("Welcome back, Asha!"));
    assert!(body.contains("Hi, Asha"));
    assert!(!body.contains("href=\"/admin\""), "customers get no admin link");

    let body = ctx.page("/").await;
    assert!(!body.contains("Welcome back"), "flash is shown once");
}

#[tokio::test]
async fn test_signed_in_visitor_skips_login_page() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;

    let response = ctx.get("/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;
    assert!(ctx.page("/orders").await.contains("Sign out"));

    let response = ctx.post_form("/logout", &[]).await;
    assert_eq!(location(&response), "/");

    let body = ctx.page("/").await;
    assert!(body.contains("You have been signed out"));
    assert!(body.contains("Sign in"));

    let response = ctx.get("/orders").await;
    assert_eq!(location(&response), "/login");
}

// ============================================================================
// Signup & Verification
// ============================================================================

#[tokio::test]
async fn test_signup_verify_then_login() {
    let ctx = TestContext::new().await;
    let email = "ravi@glowishii.test";

    let response = ctx
        .post_form(
            "/signup",
            &[("name", "Ravi Kumar"), ("email", email), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/verify-email");

    let body = ctx.page("/verify-email").await;
    assert!(body.contains("Check your email for the verification code"));
    assert!(body.contains(email));

    let response = ctx.post_form("/verify-email", &[("otp", "000000")]).await;
    assert_eq!(location(&response), "/verify-email");
    assert!(ctx.page("/verify-email").await.contains("Invalid or expired code"));

    let response = ctx.post_form("/verify-email", &[("otp", VALID_OTP)]).await;
    assert_eq!(location(&response), "/login");
    assert!(ctx.page("/login").await.contains("Email verified. You can sign in now."));

    ctx.sign_in(email).await;
    assert!(ctx.page("/").await.contains("Welcome back, Ravi!"));
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/signup",
            &[("name", "Ravi Kumar"), ("email", "ravi@glowishii.test"), ("password", "short")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Password must be at least 8 characters"));
}

#[tokio::test]
async fn test_signup_with_existing_email_is_refused() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/signup",
            &[("name", "Asha Again"), ("email", CUSTOMER_EMAIL), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("User already exists"));
}

#[tokio::test]
async fn test_verify_page_without_pending_signup_goes_to_signup() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/verify-email").await;
    assert_eq!(location(&response), "/signup");
}

#[tokio::test]
async fn test_malformed_code_is_rejected_locally() {
    let ctx = TestContext::new().await;
    ctx.post_form(
        "/signup",
        &[("name", "Ravi Kumar"), ("email", "ravi@glowishii.test"), ("password", PASSWORD)],
    )
    .await;

    let response = ctx.post_form("/verify-email", &[("otp", "12ab")]).await;
    assert_eq!(location(&response), "/verify-email");
    assert!(ctx.page("/verify-email").await.contains("Verification code must be 6 digits"));
}

// ============================================================================
// Profile Addresses
// ============================================================================

#[tokio::test]
async fn test_profile_lists_saved_address() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;

    let body = ctx.page("/profile").await;
    assert!(body.contains(CUSTOMER_EMAIL));
    assert!(body.contains("12 MG Road"));
}

#[tokio::test]
async fn test_add_address_validates_then_saves() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;

    let mut form = vec![
        ("name", "Asha Rao"),
        ("street", "4 Park Street"),
        ("city", "Kolkata"),
        ("state", "West Bengal"),
        ("pincode", "7000"),
        ("country", "India"),
        ("phone", "9830012345"),
    ];

    let response = ctx.post_form("/profile/addresses", &form).await;
    assert_eq!(location(&response), "/profile");
    let body = ctx.page("/profile").await;
    assert!(body.contains("Pincode must be exactly 6 digits"));
    assert!(!body.contains("4 Park Street"));

    form[4] = ("pincode", "700016");
    ctx.post_form("/profile/addresses", &form).await;
    let body = ctx.page("/profile").await;
    assert!(body.contains("Address saved successfully"));
    assert!(body.contains("4 Park Street"));
}

#[tokio::test]
async fn test_delete_address() {
    let ctx = TestContext::new().await;
    ctx.sign_in(CUSTOMER_EMAIL).await;

    let response = ctx.post_form("/profile/addresses/a1/delete", &[]).await;
    assert_eq!(location(&response), "/profile");

    let body = ctx.page("/profile").await;
    assert!(body.contains("Address deleted"));
    assert!(!body.contains("12 MG Road"));
}
