//! Email providers: SMTP for real delivery, an in-memory mock otherwise.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};
use crate::config::SmtpConfig;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    enabled: bool,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, ProviderError> {
        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse::<Mailbox>()
            .map_err(|e| {
                ProviderError::Configuration(format!("Invalid from address: {}", e))
            })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| ProviderError::Configuration(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            enabled: config.enabled,
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled("smtp".to_string()));
        }

        let to = message.to.parse::<Mailbox>().map_err(|e| {
            ProviderError::InvalidRecipient(format!("{}: {}", message.to, e))
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.body_html.clone())
            .map_err(|e| ProviderError::SendFailed(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| ProviderError::SendFailed(e.to_string()))?;

        tracing::info!(to = %message.to, "Email sent via SMTP");
        Ok(ProviderResponse {
            provider_id: "smtp".to_string(),
            success: true,
            message: "Email sent".to_string(),
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Accepts every well-formed recipient and counts sends. Stands in for
/// SMTP in development and tests.
pub struct MockMailer {
    enabled: bool,
    send_count: AtomicU64,
}

impl MockMailer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmailProvider for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled("mock".to_string()));
        }
        if !message.to.contains('@') {
            return Err(ProviderError::InvalidRecipient(message.to.clone()));
        }

        let count = self.send_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(to = %message.to, subject = %message.subject, "Mock email send");
        Ok(ProviderResponse {
            provider_id: "mock".to_string(),
            success: true,
            message: format!("Mock send #{}", count),
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(self.enabled)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
