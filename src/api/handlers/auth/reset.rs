//! Password reset endpoints.
//!
//! The request side is anti-enumeration: whether or not the email maps to an
//! account, the caller sees the same 204. The consumption side burns the
//! token on every attempt and reports one generic failure for "never existed"
//! and "expired" alike.

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
    consume_single_use_token, find_account_by_email, put_single_use_token, ConsumeOutcome,
    TokenKind,
};
use super::types::{ForgotPasswordRequest, ResetPasswordRequest};
use super::utils::{build_reset_url, generate_token, hash_token, normalize_email, valid_email};

/// Create a reset token for an existing account and request delivery.
///
/// Returns `Ok(None)` when the email does not map to an account; the caller
/// must not let that difference reach the boundary. Prior unexpired tokens
/// for the same account are left alone (accepted tolerance: the newest and
/// the older ones are each still single-use).
pub(super) async fn issue_password_reset_token(
    pool: &PgPool,
    auth_state: &AuthState,
    email: &str,
) -> anyhow::Result<Option<String>> {
    let Some(account) = find_account_by_email(pool, email).await? else {
        return Ok(None);
    };

    let token = generate_token()?;
    let expires_at = auth_state.clock().now()
        + Duration::seconds(auth_state.config().reset_token_ttl_seconds());
    put_single_use_token(
        pool,
        TokenKind::PasswordReset,
        &hash_token(&token),
        &account.email,
        expires_at,
    )
    .await?;

    let reset_url = build_reset_url(auth_state.config().frontend_base_url(), &token);
    auth_state.notifier().send(
        &account.email,
        "Reset your password",
        &format!("Use this link to choose a new password: {reset_url}"),
    )?;

    Ok(Some(token))
}

#[utoipa::path(
    post,
    path = "/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 204, description = "Reset requested"),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> impl IntoResponse {
    let request: ForgotPasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        // Always 204 for malformed emails to avoid account probing.
        return StatusCode::NO_CONTENT.into_response();
    }

    match issue_password_reset_token(&pool, &auth_state, &email).await {
        Ok(Some(_) | None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to issue password reset token: {err}");
            // A distinguishable failure here would leak account existence.
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Token consumed, reset may proceed"),
        (status = 400, description = "Invalid/expired token", body = String)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> impl IntoResponse {
    let request: ResetPasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let token = request.token.trim();
    if token.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    }

    let now = auth_state.clock().now();
    match consume_single_use_token(&pool, TokenKind::PasswordReset, token, now).await {
        Ok(ConsumeOutcome::Consumed(_email)) => {
            // The credential update itself belongs to the account system; the
            // consumed token authorizes it.
            StatusCode::NO_CONTENT.into_response()
        }
        // NotFound and Expired are indistinguishable at the boundary.
        Ok(ConsumeOutcome::NotFound | ConsumeOutcome::Expired) => (
            StatusCode::BAD_REQUEST,
            "Invalid or expired token".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to consume password reset token: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Reset failed".to_string()).into_response()
        }
    }
}
