//! Database helpers for accounts, the session registry, and single-use tokens.
//!
//! Schema owned by the account system, touched here:
//! - `users`: `id`, `email` (normalized), `password_record`, `role`, `status`
//!   (`pending` | `active`), `blocked`, and the session slot columns
//!   `session_token_hash`, `session_created_at`, `session_device`.
//! - `password_reset_tokens` / `email_verification_tokens`: same shape,
//!   `token_hash` (primary key), `email`, `expires_at`.
//!
//! Session writes are single-row `UPDATE`s, so two concurrent logins are a
//! clean last-writer-wins race. Token consumption is `DELETE … RETURNING`:
//! Postgres serializes the row delete, exactly one caller gets the record.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::hash_token;
use crate::access::Role;

/// Current session slot on an account. At most one per account.
#[derive(Clone, Debug)]
pub(crate) struct SessionSlot {
    pub(crate) token_hash: Vec<u8>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) device: String,
}

/// Account fields this core reads. The role is decoded leniently; an
/// unknown value surfaces as `None` and resolves to the most restrictive
/// capability set downstream.
#[derive(Clone, Debug)]
pub(crate) struct AccountRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) password_record: String,
    pub(crate) role: Option<Role>,
    pub(crate) status: String,
    pub(crate) blocked: bool,
    pub(crate) session: Option<SessionSlot>,
}

impl AccountRecord {
    /// An account is usable iff it is active and not blocked. A valid session
    /// token on an unusable account must be treated as unauthenticated.
    pub(crate) fn is_usable(&self) -> bool {
        self.status == "active" && !self.blocked
    }
}

/// The two independent single-use token stores share one record shape.
#[derive(Clone, Copy, Debug)]
pub(crate) enum TokenKind {
    PasswordReset,
    EmailVerification,
}

impl TokenKind {
    const fn put_query(self) -> &'static str {
        match self {
            Self::PasswordReset => {
                "INSERT INTO password_reset_tokens (token_hash, email, expires_at)
                 VALUES ($1, $2, $3)"
            }
            Self::EmailVerification => {
                "INSERT INTO email_verification_tokens (token_hash, email, expires_at)
                 VALUES ($1, $2, $3)"
            }
        }
    }

    const fn take_query(self) -> &'static str {
        match self {
            Self::PasswordReset => {
                "DELETE FROM password_reset_tokens
                 WHERE token_hash = $1
                 RETURNING email, expires_at"
            }
            Self::EmailVerification => {
                "DELETE FROM email_verification_tokens
                 WHERE token_hash = $1
                 RETURNING email, expires_at"
            }
        }
    }
}

/// Outcome of a single-use token consumption attempt.
///
/// `Expired` means the record existed but its expiry had passed; the record
/// is already deleted by the time this value is returned, so a retry with the
/// same token yields `NotFound`.
#[derive(Debug)]
pub(crate) enum ConsumeOutcome {
    Consumed(String),
    NotFound,
    Expired,
}

const ACCOUNT_COLUMNS: &str = "id, email, password_record, role, status, blocked, \
     session_token_hash, session_created_at, session_device";

fn account_from_row(row: &sqlx::postgres::PgRow) -> AccountRecord {
    let token_hash: Option<Vec<u8>> = row.get("session_token_hash");
    let created_at: Option<DateTime<Utc>> = row.get("session_created_at");
    let device: Option<String> = row.get("session_device");
    // The slot is only populated when every field of the atomic write is
    // present; a half-empty slot reads as "no session".
    let session = match (token_hash, created_at) {
        (Some(token_hash), Some(created_at)) => Some(SessionSlot {
            token_hash,
            created_at,
            device: device.unwrap_or_default(),
        }),
        _ => None,
    };

    let role: Option<String> = row.get("role");
    AccountRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_record: row.get("password_record"),
        role: role.as_deref().and_then(Role::from_db),
        status: row.get("status"),
        blocked: row.get("blocked"),
        session,
    }
}

pub(crate) async fn find_account_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AccountRecord>> {
    let query = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup account by email")?;
    Ok(row.as_ref().map(account_from_row))
}

pub(crate) async fn find_account_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AccountRecord>> {
    let query = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup account by id")?;
    Ok(row.as_ref().map(account_from_row))
}

/// Overwrite the account's session slot. Unconditional: whichever login wins
/// the race owns the sole valid session afterwards.
pub(crate) async fn replace_session(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &[u8],
    created_at: DateTime<Utc>,
    device: &str,
) -> Result<()> {
    let query = r"
        UPDATE users
        SET session_token_hash = $2,
            session_created_at = $3,
            session_device = $4
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(token_hash)
        .bind(created_at)
        .bind(device)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to replace session")?;
    Ok(())
}

/// Clear the session slot. Idempotent; clearing an empty slot is fine.
pub(crate) async fn clear_session(pool: &PgPool, user_id: Uuid) -> Result<()> {
    let query = r"
        UPDATE users
        SET session_token_hash = NULL,
            session_created_at = NULL,
            session_device = NULL
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to clear session")?;
    Ok(())
}

pub(super) async fn put_single_use_token(
    pool: &PgPool,
    kind: TokenKind,
    token_hash: &[u8],
    email: &str,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    let query = kind.put_query();
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .bind(email)
        .bind(expires_at)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert single-use token")?;
    Ok(())
}

/// Atomically remove a token record, returning its fields if it existed.
async fn take_single_use_token(
    pool: &PgPool,
    kind: TokenKind,
    token_hash: &[u8],
) -> Result<Option<(String, DateTime<Utc>)>> {
    let query = kind.take_query();
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to take single-use token")?;
    Ok(row.map(|row| (row.get("email"), row.get("expires_at"))))
}

/// Judge what the atomic take produced. A missing record reads as `NotFound`,
/// which is also what a retry sees after any earlier attempt deleted the row.
/// A record whose expiry has passed reads as `Expired`; `expires_at` itself is
/// still inside the validity window.
fn judge_consumption(taken: Option<(String, DateTime<Utc>)>, now: DateTime<Utc>) -> ConsumeOutcome {
    match taken {
        None => ConsumeOutcome::NotFound,
        Some((_, expires_at)) if now > expires_at => ConsumeOutcome::Expired,
        Some((email, _)) => ConsumeOutcome::Consumed(email),
    }
}

/// Consume a single-use token: delete-first, then judge expiry. Every attempt
/// destroys the record, which is what makes the token strictly single-use.
pub(super) async fn consume_single_use_token(
    pool: &PgPool,
    kind: TokenKind,
    raw_token: &str,
    now: DateTime<Utc>,
) -> Result<ConsumeOutcome> {
    let token_hash = hash_token(raw_token);
    let taken = take_single_use_token(pool, kind, &token_hash).await?;
    Ok(judge_consumption(taken, now))
}

/// Flip a pending account to active after its email is verified.
pub(super) async fn activate_account(pool: &PgPool, email: &str) -> Result<()> {
    let query = r"
        UPDATE users
        SET status = 'active'
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to activate account")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{judge_consumption, AccountRecord, ConsumeOutcome, SessionSlot, TokenKind};
    use crate::api::handlers::auth::clock::{Clock, FixedClock};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn account(status: &str, blocked: bool) -> AccountRecord {
        AccountRecord {
            id: Uuid::nil(),
            email: "alice@example.com".to_string(),
            password_record: String::new(),
            role: None,
            status: status.to_string(),
            blocked,
            session: None,
        }
    }

    #[test]
    fn account_usable_requires_active_and_unblocked() {
        assert!(account("active", false).is_usable());
        assert!(!account("active", true).is_usable());
        assert!(!account("pending", false).is_usable());
        assert!(!account("pending", true).is_usable());
    }

    #[test]
    fn token_kind_queries_target_their_own_table() {
        assert!(TokenKind::PasswordReset
            .take_query()
            .contains("password_reset_tokens"));
        assert!(TokenKind::EmailVerification
            .take_query()
            .contains("email_verification_tokens"));
        assert!(TokenKind::PasswordReset
            .put_query()
            .contains("password_reset_tokens"));
        assert!(TokenKind::EmailVerification
            .put_query()
            .contains("email_verification_tokens"));
    }

    #[test]
    fn consumption_past_expiry_is_expired() {
        let clock = FixedClock(Utc::now());
        let now = clock.now();
        let taken = Some(("alice@example.com".to_string(), now - Duration::seconds(1)));
        assert!(matches!(
            judge_consumption(taken, now),
            ConsumeOutcome::Expired
        ));
    }

    #[test]
    fn consumption_at_the_expiry_instant_still_succeeds() {
        let clock = FixedClock(Utc::now());
        let now = clock.now();
        let taken = Some(("alice@example.com".to_string(), now));
        match judge_consumption(taken, now) {
            ConsumeOutcome::Consumed(email) => assert_eq!(email, "alice@example.com"),
            other => panic!("expected Consumed, got {other:?}"),
        }
    }

    #[test]
    fn consumption_within_the_window_returns_the_email() {
        let now = Utc::now();
        let taken = Some(("bob@example.com".to_string(), now + Duration::hours(1)));
        match judge_consumption(taken, now) {
            ConsumeOutcome::Consumed(email) => assert_eq!(email, "bob@example.com"),
            other => panic!("expected Consumed, got {other:?}"),
        }
    }

    #[test]
    fn retry_after_deletion_reads_as_not_found() {
        // The take deletes the row on every attempt, expired or not, so a
        // second consumption of the same token sees no record at all.
        let now = Utc::now();
        assert!(matches!(
            judge_consumption(None, now),
            ConsumeOutcome::NotFound
        ));
    }

    #[test]
    fn consume_outcome_debug_names() {
        assert_eq!(format!("{:?}", ConsumeOutcome::NotFound), "NotFound");
        assert_eq!(format!("{:?}", ConsumeOutcome::Expired), "Expired");
    }

    #[test]
    fn session_slot_holds_values() {
        let now = Utc::now();
        let slot = SessionSlot {
            token_hash: vec![1, 2, 3],
            created_at: now,
            device: "Firefox".to_string(),
        };
        assert_eq!(slot.token_hash, vec![1, 2, 3]);
        assert_eq!(slot.created_at, now);
        assert_eq!(slot.device, "Firefox");
    }
}
