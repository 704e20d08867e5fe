//! Email verification endpoints.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::state::AuthState;
use super::storage::{
    activate_account, consume_single_use_token, find_account_by_email, put_single_use_token,
    ConsumeOutcome, TokenKind,
};
use super::types::{ResendVerificationRequest, VerifyEmailRequest};
use super::utils::{build_verify_url, generate_token, hash_token, normalize_email, valid_email};

/// Create a verification token for an account still pending verification.
///
/// Accounts that are absent, already active, or blocked produce `Ok(None)`;
/// the boundary response is identical either way.
pub(super) async fn issue_email_verification_token(
    pool: &PgPool,
    auth_state: &AuthState,
    email: &str,
) -> anyhow::Result<Option<String>> {
    let Some(account) = find_account_by_email(pool, email).await? else {
        return Ok(None);
    };
    if account.status != "pending" {
        return Ok(None);
    }

    let token = generate_token()?;
    let expires_at = auth_state.clock().now()
        + Duration::seconds(auth_state.config().verification_token_ttl_seconds());
    put_single_use_token(
        pool,
        TokenKind::EmailVerification,
        &hash_token(&token),
        &account.email,
        expires_at,
    )
    .await?;

    let verify_url = build_verify_url(auth_state.config().frontend_base_url(), &token);
    auth_state.notifier().send(
        &account.email,
        "Verify your email address",
        &format!("Confirm your address by opening: {verify_url}"),
    )?;

    Ok(Some(token))
}

/// Verify the email link by consuming the token and activating the account.
#[utoipa::path(
    post,
    path = "/v1/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 204, description = "Email verified"),
        (status = 400, description = "Invalid/expired token", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<VerifyEmailRequest>>,
) -> impl IntoResponse {
    let request: VerifyEmailRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let token = request.token.trim();
    if token.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    }

    let now = auth_state.clock().now();
    match consume_single_use_token(&pool, TokenKind::EmailVerification, token, now).await {
        Ok(ConsumeOutcome::Consumed(email)) => {
            if let Err(err) = activate_account(&pool, &email).await {
                error!("Failed to activate account: {err}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Verification failed".to_string(),
                )
                    .into_response();
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(ConsumeOutcome::NotFound | ConsumeOutcome::Expired) => (
            StatusCode::BAD_REQUEST,
            "Invalid or expired token".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to verify email: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Verification failed".to_string(),
            )
                .into_response()
        }
    }
}

/// Resend a verification email (always returns 204 to avoid user enumeration).
#[utoipa::path(
    post,
    path = "/v1/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 204, description = "Resend accepted")
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResendVerificationRequest>>,
) -> impl IntoResponse {
    let request: ResendVerificationRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        // Always return 204 for invalid emails to avoid account probing.
        return StatusCode::NO_CONTENT.into_response();
    }

    match issue_email_verification_token(&pool, &auth_state, &email).await {
        Ok(Some(_) | None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to issue verification token: {err}");
            // Avoid leaking failures; always return 204 to callers.
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
