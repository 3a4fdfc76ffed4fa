//! Outbound email delivery.
//!
//! OTP codes leave the service only through a [`Mailer`]. The server delivers
//! over SMTP with [`SmtpMailer`], or falls back to [`LogMailer`] for local runs
//! when no relay is configured. Tests use [`MemoryMailer`] to read back what
//! was sent.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use parking_lot::RwLock;
use secrecy::ExposeSecret;

use crate::config::SmtpConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Body layout shared by every OTP email.
    pub fn otp(to: &str, subject: &str, message: &str, code: &str, ttl_minutes: i64) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            body: format!("{message}\n\n{code}\n\nThis code expires in {ttl_minutes} minute(s)."),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}

/// STARTTLS relay delivery.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .context("invalid SMTP relay")?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .with_context(|| format!("invalid sender address {}", self.from_address))?,
            )
            .to(email
                .to
                .parse()
                .with_context(|| format!("invalid recipient address {}", email.to))?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Drops each email after noting its recipient. The body holds the code, so
/// it is never written out.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, "email not delivered, no SMTP relay configured");
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().clone()
    }

    /// The numeric code in the most recent email to `to`, if any.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .read()
            .iter()
            .rev()
            .find(|e| e.to == to)
            .and_then(|e| {
                e.body
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        self.sent.write().push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_mailer_keeps_codes_per_recipient() {
        let mailer = MemoryMailer::new();
        mailer
            .send(&OutgoingEmail::otp("a@example.com", "Password Reset", "Enter it", "1234", 60))
            .await
            .unwrap();
        mailer
            .send(&OutgoingEmail::otp("b@example.com", "Password Reset", "Enter it", "5678", 60))
            .await
            .unwrap();
        mailer
            .send(&OutgoingEmail::otp("a@example.com", "Password Reset", "Enter it", "4321", 60))
            .await
            .unwrap();

        assert_eq!(mailer.sent().len(), 3);
        assert_eq!(mailer.last_code_for("a@example.com").as_deref(), Some("4321"));
        assert_eq!(mailer.last_code_for("b@example.com").as_deref(), Some("5678"));
        assert_eq!(mailer.last_code_for("c@example.com"), None);
    }

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            password: "relay-password".to_string().into(),
            from_address: "Mehendi <no-reply@example.com>".to_string(),
        }
    }

    #[test]
    fn smtp_config_debug_hides_password() {
        let rendered = format!("{:?}", smtp_config());
        assert!(rendered.contains("smtp.example.com"));
        assert!(!rendered.contains("relay-password"));
    }

    #[tokio::test]
    async fn smtp_mailer_rejects_bad_recipient_before_connecting() {
        let mailer = SmtpMailer::new(&smtp_config()).unwrap();
        let err = mailer
            .send(&OutgoingEmail::otp("not an address", "Password Reset", "Enter it", "1234", 60))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid recipient address"));
    }
}
