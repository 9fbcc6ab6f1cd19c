//! Outgoing account email.
//!
//! Delivery is fire-and-forget: registration succeeds even when sending
//! fails, and the failure is only logged.

use tracing::info;

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Sends account emails.
pub trait Mailer: Send + Sync {
    /// Sends the confirmation link for a freshly registered account.
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailerError>;
}

/// Writes confirmation links to the log instead of sending mail.
#[derive(Debug, Clone)]
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        LogMailer {
            base_url: base_url.into(),
        }
    }

    pub fn confirmation_link(&self, token: &str) -> String {
        format!("{}/auth/confirm/{}", self.base_url.trim_end_matches('/'), token)
    }
}

impl Mailer for LogMailer {
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailerError> {
        info!(to = %email, link = %self.confirmation_link(token), "Confirmation email");
        Ok(())
    }
}
