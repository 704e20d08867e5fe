//! Dashboard page handlers behind the route guard.
//!
//! Rendering belongs to the frontend; these endpoints return minimal shells
//! plus the data pages need for capability-driven UI gating. Reachability is
//! already settled by the guard, so the only checks left here are the
//! fine-grained capability ones.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::auth::Principal;

pub async fn login_page() -> impl IntoResponse {
    (StatusCode::OK, "Sign in")
}

pub async fn register_page() -> impl IntoResponse {
    (StatusCode::OK, "Create an account")
}

pub async fn forgot_password_page() -> impl IntoResponse {
    (StatusCode::OK, "Request a password reset")
}

pub async fn reset_password_page() -> impl IntoResponse {
    (StatusCode::OK, "Choose a new password")
}

pub async fn verify_email_page() -> impl IntoResponse {
    (StatusCode::OK, "Confirming your email address")
}

/// Home shell: identity plus the capability set the UI gates buttons on.
pub async fn home(principal: Option<Extension<Principal>>) -> impl IntoResponse {
    match principal {
        Some(Extension(principal)) => Json(json!({
            "email": principal.email,
            "role": principal.role,
            "capabilities": principal.capabilities(),
        }))
        .into_response(),
        // The guard redirects anonymous callers before this point.
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

pub async fn admin_home() -> impl IntoResponse {
    (StatusCode::OK, "Admin")
}

/// Stats page: reachable by every admin-area role, additionally gated on the
/// `can_view_stats` capability.
pub async fn admin_stats(principal: Option<Extension<Principal>>) -> impl IntoResponse {
    match principal {
        Some(Extension(principal)) if principal.capabilities().can_view_stats => {
            (StatusCode::OK, "Usage statistics").into_response()
        }
        Some(_) => StatusCode::FORBIDDEN.into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

pub async fn admin_users() -> impl IntoResponse {
    (StatusCode::OK, "User management")
}

pub async fn admin_subscriptions() -> impl IntoResponse {
    (StatusCode::OK, "Subscription management")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    fn principal(role: Option<Role>) -> Principal {
        Principal {
            user_id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn home_requires_a_principal() {
        let response = home(None).await.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = home(Some(Extension(principal(Some(Role::Viewer)))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_stats_gates_on_capability() {
        let response = admin_stats(Some(Extension(principal(Some(Role::Moderator)))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        // A principal that lost its role mid-session gets denied even though
        // the route itself was reachable when the guard ran.
        let response = admin_stats(Some(Extension(principal(None))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
