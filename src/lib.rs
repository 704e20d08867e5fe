//! # Gatekeeper (Session & Access Control)
//!
//! `gatekeeper` is the session and access-control authority of the dashboard.
//! It enforces a single live session per account, runs the single-use token
//! flows (password reset, email verification), and answers the route
//! authorization question for every inbound page request.
//!
//! ## Single-Session Model
//!
//! Each account holds at most one active session slot. Creating a new session
//! overwrites the slot; older cookies keep existing client-side but fail
//! validation because the registry no longer holds their token. There is no
//! explicit revoke step for superseded sessions.
//!
//! ## Token Handling
//!
//! - Session and single-use tokens are 32 random bytes, URL-safe base64.
//! - Only SHA-256 hashes are stored; raw tokens exist in the cookie or the
//!   out-of-band delivery body and are never logged.
//! - Single-use tokens are consumed with an atomic delete: expired or not,
//!   a consumption attempt removes the record.
//!
//! ## Authorization
//!
//! Route gating and page-level capability gating both read from one canonical
//! role taxonomy (`admin`, `moderator`, `viewer`) and its capability map.
//! Every decision re-resolves the account from the store; no claim embedded
//! in a cookie or token is trusted across requests.

pub mod access;
pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
