//! `OpenAPI` document for the auth API surface.
//!
//! Page routes stay out of the document on purpose; only the `/v1` endpoints
//! and `/health` are part of the public contract.

use utoipa::OpenApi;

use crate::access::{Capabilities, Role};
use crate::api::handlers::auth::types::{
    ForgotPasswordRequest, LoginRequest, ResendVerificationRequest, ResetPasswordRequest,
    SessionResponse, VerifyEmailRequest,
};
use crate::api::handlers::health::Health;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::session::login,
        crate::api::handlers::auth::session::session,
        crate::api::handlers::auth::session::logout,
        crate::api::handlers::auth::reset::forgot_password,
        crate::api::handlers::auth::reset::reset_password,
        crate::api::handlers::auth::verification::verify_email,
        crate::api::handlers::auth::verification::resend_verification,
    ),
    components(schemas(
        Health,
        LoginRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        VerifyEmailRequest,
        ResendVerificationRequest,
        SessionResponse,
        Role,
        Capabilities,
    )),
    tags(
        (name = "auth", description = "Session and single-use token flows"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
