//! Session endpoints and the session validator.
//!
//! One session per account: issuing writes the account's single session slot,
//! so the previous token keeps existing client-side but stops validating.
//! The cookie carries `user_id.token`; the id locates the registry entry and
//! the token is compared (hashed, constant-time) against the stored value.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::state::AuthState;
use super::storage::{
    clear_session, find_account_by_email, find_account_by_id, replace_session, AccountRecord,
    SessionSlot,
};
use super::types::{LoginRequest, SessionResponse};
use super::utils::{constant_time_eq, generate_token, hash_token, normalize_email};
use crate::access::{classify_device, Capabilities};

const SESSION_COOKIE_NAME: &str = "gatekeeper_session";

/// Session validity, fail closed: false on empty token, missing slot, or
/// mismatch. Comparison runs over SHA-256 hashes in constant time.
pub(crate) fn validate_session(slot: Option<&SessionSlot>, presented: &str) -> bool {
    let Some(slot) = slot else {
        return false;
    };
    if presented.is_empty() {
        return false;
    }
    constant_time_eq(&hash_token(presented), &slot.token_hash)
}

/// Issue a fresh session for an account, superseding any prior one.
/// Returns the raw token; only its hash is stored.
pub(crate) async fn issue_session(
    pool: &PgPool,
    auth_state: &AuthState,
    account_id: Uuid,
    device_descriptor: &str,
) -> anyhow::Result<String> {
    let token = generate_token()?;
    let device = classify_device(device_descriptor);
    replace_session(
        pool,
        account_id,
        &hash_token(&token),
        auth_state.clock().now(),
        device,
    )
    .await?;
    Ok(token)
}

/// Resolve the presented session token into a live, usable account.
///
/// `Ok(None)` covers every unauthenticated shape: missing/garbled cookie,
/// unknown account, stale token, or an account that is blocked or not yet
/// active. Store failures are surfaced as 500, never as "no session".
pub(crate) async fn authenticate_session(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<Option<AccountRecord>, StatusCode> {
    let Some(presented) = extract_session_token(headers) else {
        return Ok(None);
    };
    let Some((account_id, token)) = split_session_value(&presented) else {
        return Ok(None);
    };
    let account = match find_account_by_id(pool, account_id).await {
        Ok(account) => account,
        Err(err) => {
            error!("Failed to lookup account for session: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let Some(account) = account else {
        return Ok(None);
    };
    if !account.is_usable() {
        return Ok(None);
    }
    if !validate_session(account.session.as_ref(), token) {
        return Ok(None);
    }
    Ok(Some(account))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Session established, cookie set"),
        (status = 400, description = "Missing payload", body = String),
        (status = 401, description = "Invalid credentials", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    // Unknown account, wrong password, and unusable account all produce the
    // same 401 so the response shape leaks nothing.
    let rejected =
        || (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()).into_response();

    let email = normalize_email(&request.email);
    if email.is_empty() || request.password.is_empty() {
        return rejected();
    }

    let account = match find_account_by_email(&pool, &email).await {
        Ok(account) => account,
        Err(err) => {
            error!("Failed to lookup account for login: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let Some(account) = account else {
        return rejected();
    };
    if !account.is_usable() {
        return rejected();
    }
    if !auth_state
        .credentials()
        .verify(&account.password_record, &request.password)
    {
        return rejected();
    }

    let device_descriptor = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = match issue_session(&pool, &auth_state, account.id, device_descriptor).await {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue session: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(&auth_state, account.id, &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    match authenticate_session(&headers, &pool).await {
        Ok(Some(account)) => {
            let response = SessionResponse {
                user_id: account.id.to_string(),
                email: account.email.clone(),
                role: account.role,
                capabilities: account
                    .role
                    .map_or(Capabilities::NONE, |role| role.capabilities()),
                device: account.session.map(|slot| slot.device),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(status) => status.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    // Only a token that still validates clears the registry slot; a stale
    // cookie must not be able to revoke the session that superseded it.
    match authenticate_session(&headers, &pool).await {
        Ok(Some(account)) => {
            if let Err(err) = clear_session(&pool, account.id).await {
                error!("Failed to clear session: {err}");
            }
        }
        Ok(None) => {}
        Err(status) => {
            error!("Store unavailable during logout: {status}");
        }
    }

    // Always expire the cookie, even when the slot was already empty.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie() {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// Build a secure `HttpOnly` cookie carrying `user_id.token`.
fn session_cookie(
    auth_state: &AuthState,
    account_id: Uuid,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = auth_state.config().session_cookie_ttl_seconds();
    let secure = auth_state.config().session_cookie_secure();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={account_id}.{token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

/// Split the presented `user_id.token` value.
fn split_session_value(value: &str) -> Option<(Uuid, &str)> {
    let (id, token) = value.split_once('.')?;
    let account_id = Uuid::parse_str(id).ok()?;
    if token.is_empty() {
        return None;
    }
    Some((account_id, token))
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        // Pairs without `=` are skipped; one malformed cookie must not hide
        // the session cookie further down the header.
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        if key.trim() == SESSION_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
