//! Transactional email is an external collaborator (spec §1 "out of
//! scope"): this crate only defines the contract the auth service calls
//! through. A failed send never fails the user-facing action that
//! triggered it (spec §7) — the resend path exists precisely so the user
//! has a way to recover.

use async_trait::async_trait;
use corpora_core::CoreError;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_verification_email(&self, to: &str, verify_url: &str) -> Result<(), CoreError>;
}

/// Test/dev stand-in that logs instead of delivering. Real deployments wire
/// an SMTP- or API-backed sender behind the same trait.
pub struct LoggingEmailSender;

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_verification_email(&self, to: &str, verify_url: &str) -> Result<(), CoreError> {
        tracing::info!(to, verify_url, "verification email (logged, not sent)");
        Ok(())
    }
}
