//! Canonical role taxonomy and its capability map.
//!
//! The dashboard historically used two role vocabularies (`admin/moderator/user`
//! on the routing side, `admin/editor/viewer` on the UI side). Both collapse
//! into the single taxonomy below; the legacy names are accepted as aliases
//! when decoding stored values so old rows keep resolving.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. Route gating and page gating both derive from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    Viewer,
}

/// Fixed per-role capability set.
///
/// The map is total: every role resolves to exactly one entry, and callers
/// holding no role at all use [`Capabilities::NONE`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    pub can_manage_users: bool,
    pub can_edit_content: bool,
    pub can_view_stats: bool,
    pub can_delete_content: bool,
    pub can_access_admin: bool,
}

impl Capabilities {
    /// Most restrictive set, used when no role can be resolved.
    pub const NONE: Self = Self {
        can_manage_users: false,
        can_edit_content: false,
        can_view_stats: false,
        can_delete_content: false,
        can_access_admin: false,
    };
}

impl Role {
    /// Decode a stored role value, accepting the legacy vocabulary.
    #[must_use]
    pub fn from_db(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "moderator" | "editor" => Some(Self::Moderator),
            "viewer" | "user" => Some(Self::Viewer),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Viewer => "viewer",
        }
    }

    /// Capability set for this role.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::Admin => Capabilities {
                can_manage_users: true,
                can_edit_content: true,
                can_view_stats: true,
                can_delete_content: true,
                can_access_admin: true,
            },
            Self::Moderator => Capabilities {
                can_manage_users: false,
                can_edit_content: true,
                can_view_stats: true,
                can_delete_content: true,
                can_access_admin: true,
            },
            Self::Viewer => Capabilities {
                can_manage_users: false,
                can_edit_content: false,
                can_view_stats: false,
                can_delete_content: false,
                can_access_admin: false,
            },
        }
    }
}
