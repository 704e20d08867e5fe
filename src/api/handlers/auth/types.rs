//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::access::{Capabilities, Role};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResetPasswordRequest {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    /// `None` when the stored role could not be resolved; capabilities are
    /// the empty set in that case, so the two fields always agree.
    pub role: Option<Role>,
    pub capabilities: Capabilities,
    pub device: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_request_round_trips() -> Result<()> {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: LoginRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.password, "hunter2");
        Ok(())
    }

    #[test]
    fn session_response_serializes_role_lowercase() -> Result<()> {
        let response = SessionResponse {
            user_id: "id".to_string(),
            email: "alice@example.com".to_string(),
            role: Some(Role::Moderator),
            capabilities: Role::Moderator.capabilities(),
            device: Some("Firefox".to_string()),
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value.get("role").and_then(serde_json::Value::as_str),
            Some("moderator")
        );
        assert_eq!(
            value
                .pointer("/capabilities/can_access_admin")
                .and_then(serde_json::Value::as_bool),
            Some(true)
        );
        Ok(())
    }

    #[test]
    fn session_response_unresolved_role_pairs_with_empty_capabilities() -> Result<()> {
        // An account whose stored role did not decode reports no role, not a
        // fabricated one, and the capability set matches.
        let response = SessionResponse {
            user_id: "id".to_string(),
            email: "alice@example.com".to_string(),
            role: None,
            capabilities: Capabilities::NONE,
            device: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("role").is_some_and(serde_json::Value::is_null));
        assert_eq!(
            value
                .pointer("/capabilities/can_access_admin")
                .and_then(serde_json::Value::as_bool),
            Some(false)
        );
        Ok(())
    }

    #[test]
    fn reset_password_request_round_trips() -> Result<()> {
        let request = ResetPasswordRequest {
            token: "opaque".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let decoded: ResetPasswordRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.token, "opaque");
        Ok(())
    }
}
