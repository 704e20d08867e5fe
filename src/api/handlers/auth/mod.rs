//! Auth handlers and supporting modules.
//!
//! This module coordinates session issuance and validation, the single-use
//! token flows (password reset, email verification), and the per-request
//! principal used by page gating.
//!
//! ## Single Session
//!
//! The registry holds one session slot per account. `login` overwrites the
//! slot, so the previously issued cookie stops validating without an explicit
//! revoke. `logout` clears the slot and is idempotent.
//!
//! ## Token Hygiene
//!
//! Raw tokens appear only in the session cookie and the out-of-band delivery
//! body. Storage and logs see SHA-256 hashes at most.

pub(crate) mod clock;
pub(crate) mod credentials;
pub(crate) mod guard;
pub(crate) mod principal;
pub(crate) mod reset;
pub(crate) mod session;
mod state;
mod storage;
pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::{CredentialVerifier, DigestCredentialVerifier};
pub use principal::Principal;
pub use state::{AuthConfig, AuthState};
