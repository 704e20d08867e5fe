//! Authenticated principal handed to page handlers.
//!
//! The page guard resolves the session through the registry and injects a
//! principal as a request extension. Role and capabilities are re-read from
//! the store on every request; nothing embedded in the cookie is trusted
//! beyond locating the account.

use uuid::Uuid;

use super::storage::AccountRecord;
use crate::access::{Capabilities, Role};

/// Authenticated account context derived from the session cookie.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: Option<Role>,
}

impl Principal {
    pub(crate) fn from_account(account: &AccountRecord) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role,
        }
    }

    /// Capability set for page-level gating; no role means no capabilities.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.role
            .map_or(Capabilities::NONE, |role| role.capabilities())
    }
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use crate::access::Role;
    use uuid::Uuid;

    #[test]
    fn principal_without_role_has_no_capabilities() {
        let principal = Principal {
            user_id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            role: None,
        };
        assert!(!principal.capabilities().can_access_admin);
        assert!(!principal.capabilities().can_view_stats);
    }

    #[test]
    fn principal_capabilities_follow_role() {
        let principal = Principal {
            user_id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            role: Some(Role::Moderator),
        };
        assert!(principal.capabilities().can_access_admin);
        assert!(!principal.capabilities().can_manage_users);
    }
}
