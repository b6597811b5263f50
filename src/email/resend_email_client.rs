use crate::configuration::EmailClientSettings;
use crate::domain::SubscriberEmail;
use crate::email::{Email, EmailDelivery, EmailError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

pub struct ResendEmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    api_key: Secret<String>,
}

impl ResendEmailClient {
    pub fn new(
        settings: &EmailClientSettings,
        sender: SubscriberEmail,
        api_key: Secret<String>,
    ) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build the email HTTP client.")?;
        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            sender,
            api_key,
        })
    }
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[async_trait]
impl Email for ResendEmailClient {
    #[tracing::instrument(name = "Send email through Resend", skip(self, html_content, text_content))]
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<EmailDelivery, EmailError> {
        let body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: [recipient.as_ref()],
            subject,
            html: html_content,
            text: text_content,
        };
        let response = self
            .http_client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Email API rejected the message");
            return Err(EmailError::Upstream {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        Ok(EmailDelivery::Sent)
    }
}

#[derive(serde::Deserialize)]
struct Rejection {
    message: String,
}

/// `message` from the API's error body, otherwise the raw body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Rejection>(body)
        .map(|r| r.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
