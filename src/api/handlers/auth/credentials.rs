//! Credential verification boundary.
//!
//! Credential storage and hashing policy belong to the account system; this
//! core only needs a yes/no answer for the login flow. The policy lives
//! behind the trait so it can be swapped without touching session logic.

use super::utils::{constant_time_eq, hash_token};
use base64ct::{Base64UrlUnpadded, Encoding};

pub trait CredentialVerifier: Send + Sync {
    /// Compare a presented password against the account's stored credential
    /// record. The record format is owned by the implementation.
    fn verify(&self, stored_record: &str, presented: &str) -> bool;
}

/// Default verifier: the stored record is the URL-safe base64 SHA-256 digest
/// of the password. Comparison is constant-time on the digest bytes.
#[derive(Clone, Debug)]
pub struct DigestCredentialVerifier;

impl CredentialVerifier for DigestCredentialVerifier {
    fn verify(&self, stored_record: &str, presented: &str) -> bool {
        let Ok(stored) = Base64UrlUnpadded::decode_vec(stored_record) else {
            // Undecodable records deny, never allow.
            return false;
        };
        constant_time_eq(&stored, &hash_token(presented))
    }
}
