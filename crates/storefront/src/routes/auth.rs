//! Authentication route handlers.
//!
//! Handles login, signup, email verification by one-time code and logout.
//! The shop API owns accounts and credentials; the storefront keeps the API
//! session cookie in its own session after a successful login.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Credentials, Email, OtpCode, SignupDraft};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext, clear_session, push_flash, set_current_user};
use crate::models::{CurrentUser, Flash, session_keys};
use crate::routes::{cart::refresh_cart, sentence};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Verification form data.
#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    pub otp: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub error: String,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub error: String,
}

/// Email verification page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub page: PageContext,
    pub email: String,
}

async fn pending_email(session: &Session) -> Option<Email> {
    session
        .get::<Email>(session_keys::PENDING_EMAIL)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display login page.
pub async fn login_page(OptionalAuth(user): OptionalAuth, page: PageContext) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        page,
        email: String::new(),
        error: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, page, form))]
pub async fn login(
    State(state): State<AppState>,
    page: PageContext,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rejected = |page, message: String| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                page,
                email: form.email.clone(),
                error: message,
            },
        )
            .into_response()
    };

    let credentials = match Credentials::parse(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(e) => return Ok(rejected(page, sentence(&e))),
    };

    let (user, api_session) = match state.api().login(&credentials).await {
        Ok(login) => login,
        Err(e) => {
            tracing::info!(error = %e, "Login rejected");
            return Ok(rejected(page, e.user_message()));
        }
    };

    let current = CurrentUser::new(&user, api_session);
    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, admin = current.is_admin, "User logged in");

    refresh_cart(&state, &session, &current).await?;
    push_flash(
        &session,
        Flash::success(format!("Welcome back, {}!", current.first_name())),
    )
    .await;

    Ok(Redirect::to("/").into_response())
}

/// Display signup page.
pub async fn signup_page(OptionalAuth(user): OptionalAuth, page: PageContext) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    SignupTemplate {
        page,
        name: String::new(),
        email: String::new(),
        error: String::new(),
    }
    .into_response()
}

/// Handle signup form submission.
///
/// On success the API mails a one-time code and the visitor is sent to the
/// verification page.
#[instrument(skip(state, session, page, form))]
pub async fn signup(
    State(state): State<AppState>,
    page: PageContext,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let rejected = |page, message: String| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            SignupTemplate {
                page,
                name: form.name.clone(),
                email: form.email.clone(),
                error: message,
            },
        )
            .into_response()
    };

    let draft = match SignupDraft::parse(&form.name, &form.email, &form.password) {
        Ok(draft) => draft,
        Err(e) => return Ok(rejected(page, sentence(&e))),
    };

    if let Err(e) = state.api().signup(&draft).await {
        tracing::info!(error = %e, "Signup rejected");
        return Ok(rejected(page, e.user_message()));
    }

    session
        .insert(session_keys::PENDING_EMAIL, &draft.email)
        .await?;
    tracing::info!(email_domain = draft.email.domain(), "Account created, awaiting verification");
    push_flash(
        &session,
        Flash::success("Account created. Check your email for the verification code."),
    )
    .await;

    Ok(Redirect::to("/verify-email").into_response())
}

/// Display email verification page.
pub async fn verify_page(page: PageContext, session: Session) -> Response {
    match pending_email(&session).await {
        Some(email) => VerifyTemplate {
            page,
            email: email.to_string(),
        }
        .into_response(),
        None => Redirect::to("/signup").into_response(),
    }
}

/// Handle verification code submission.
#[instrument(skip(state, session))]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VerifyForm>,
) -> Result<Redirect> {
    let Some(email) = pending_email(&session).await else {
        return Ok(Redirect::to("/signup"));
    };

    let code = match OtpCode::parse(&form.otp) {
        Ok(code) => code,
        Err(e) => {
            push_flash(&session, Flash::error(sentence(&e))).await;
            return Ok(Redirect::to("/verify-email"));
        }
    };

    match state.api().verify_otp(&email, &code).await {
        Ok(()) => {
            session.remove::<Email>(session_keys::PENDING_EMAIL).await?;
            push_flash(&session, Flash::success("Email verified. You can sign in now.")).await;
            Ok(Redirect::to("/login"))
        }
        Err(e) => {
            tracing::info!(error = %e, "Verification code rejected");
            push_flash(&session, Flash::error("Invalid or expired code")).await;
            Ok(Redirect::to("/verify-email"))
        }
    }
}

/// Send a fresh verification code.
#[instrument(skip(state, session))]
pub async fn resend(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let Some(email) = pending_email(&session).await else {
        return Ok(Redirect::to("/signup"));
    };

    match state.api().send_otp(&email).await {
        Ok(()) => push_flash(&session, Flash::success("A new code is on its way")).await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resend verification code");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to("/verify-email"))
}

/// Handle logout.
///
/// Ending the API session is best effort; the local session is always
/// cleared.
#[instrument(skip(state, session, user))]
pub async fn logout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Redirect> {
    if let Some(user) = user {
        if let Err(e) = state.api().logout(&user.api_session).await {
            tracing::warn!(error = %e, user_id = %user.id, "API logout failed");
        }
        tracing::info!(user_id = %user.id, "User logged out");
    }

    clear_session(&session).await?;
    clear_sentry_user();
    push_flash(&session, Flash::success("You have been signed out")).await;

    Ok(Redirect::to("/"))
}
