mod resend_email_client;
pub mod templates;

use crate::configuration::EmailClientSettings;
use crate::domain::SubscriberEmail;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub use resend_email_client::ResendEmailClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailDelivery {
    Sent,
    /// No mail provider is configured; nothing left the process.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("The email API answered {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("Failed to reach the email API.")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait Email: Send + Sync {
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<EmailDelivery, EmailError>;
}

pub struct NoopEmailClient;

#[async_trait]
impl Email for NoopEmailClient {
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        _html_content: &str,
        _text_content: &str,
    ) -> Result<EmailDelivery, EmailError> {
        tracing::info!(%recipient, subject, "No email provider configured, skipping delivery");
        Ok(EmailDelivery::Skipped)
    }
}

pub fn from_settings(settings: &EmailClientSettings) -> Result<Arc<dyn Email>, anyhow::Error> {
    match &settings.api_key {
        Some(key) if !key.expose_secret().trim().is_empty() => {
            let sender = settings.sender().map_err(anyhow::Error::msg)?;
            Ok(Arc::new(ResendEmailClient::new(
                settings,
                sender,
                Secret::new(key.expose_secret().clone()),
            )?))
        }
        _ => Ok(Arc::new(NoopEmailClient)),
    }
}
