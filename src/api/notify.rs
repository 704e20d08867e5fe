//! Out-of-band delivery abstraction.
//!
//! The reset and verification flows produce a delivery request (address,
//! subject, body) and hand it to a `Notifier`; transport is someone else's
//! problem and delivery is never confirmed back to the core. Message bodies
//! carry bearer tokens, so implementations must not log them.

use anyhow::Result;
use tracing::info;

pub trait Notifier: Send + Sync {
    /// Request out-of-band delivery of a message.
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Local dev notifier: records that a delivery was requested. The body is
/// intentionally dropped because it contains the raw token.
#[derive(Clone, Debug)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(
            to = %to,
            subject = %subject,
            body_bytes = body.len(),
            "notification delivery requested"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LogNotifier, Notifier};

    #[test]
    fn log_notifier_accepts_messages() {
        let result = LogNotifier.send(
            "alice@example.com",
            "Reset your password",
            "https://dashboard.tld/reset-password#token=secret",
        );
        assert!(result.is_ok());
    }
}
