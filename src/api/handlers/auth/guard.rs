//! Page-route guard middleware.
//!
//! Runs the route authorization decision on every dashboard page request:
//! resolve the session through the registry, classify the path, and act on
//! the pure decision. Store failures abort the request with 500 — an
//! unreachable registry must never read as "no session".

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::PgPool;

use super::principal::Principal;
use super::session::authenticate_session;
use crate::access::{
    classify_route, decide, Decision, ADMIN_HOME_ROUTE, HOME_ROUTE, LOGIN_ROUTE,
};

pub(crate) async fn route_guard(
    Extension(pool): Extension<PgPool>,
    mut request: Request,
    next: Next,
) -> Response {
    let class = classify_route(request.uri().path());

    let account = match authenticate_session(request.headers(), &pool).await {
        Ok(account) => account,
        Err(status) => return status.into_response(),
    };

    let has_valid_session = account.is_some();
    let role = account.as_ref().and_then(|account| account.role);

    match decide(has_valid_session, role, class) {
        Decision::Allow => {
            if let Some(account) = account {
                // Pages read role/capabilities from the principal for their
                // own fine-grained gating.
                request
                    .extensions_mut()
                    .insert(Principal::from_account(&account));
            }
            next.run(request).await
        }
        Decision::RedirectLogin => Redirect::to(LOGIN_ROUTE).into_response(),
        Decision::RedirectHome => Redirect::to(HOME_ROUTE).into_response(),
        Decision::RedirectAdminRoot => Redirect::to(ADMIN_HOME_ROUTE).into_response(),
    }
}
