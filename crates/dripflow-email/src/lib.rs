// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email channel client for the Dripflow campaign engine.
//!
//! Implements [`ChannelClient`] over async SMTP via lettre. "Success" means
//! the relay accepted the message for delivery, not that it was delivered.

pub mod templates;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use dripflow_config::model::EmailConfig;
use dripflow_core::{ChannelClient, DripflowError, OutboundContent, Platform, PostId, PostMetrics};

pub use templates::{EmailTemplate, TemplateVars};

/// SMTP-backed email channel.
///
/// Construction fails fast when credentials are missing so a misconfigured
/// deployment surfaces at startup rather than silently no-oping on the
/// first tick.
pub struct EmailChannel {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailChannel {
    /// Creates a new email channel from configuration.
    ///
    /// Requires `email.address` and `email.password` to be set.
    pub fn new(config: &EmailConfig) -> Result<Self, DripflowError> {
        let address = config
            .address
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                DripflowError::Config("email.address is required for the email channel".into())
            })?;
        let password = config
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                DripflowError::Config("email.password is required for the email channel".into())
            })?;

        let sender: Mailbox = format!("{} <{}>", config.sender_name, address)
            .parse()
            .map_err(|e| {
                DripflowError::Config(format!("email.address `{address}` is not a mailbox: {e}"))
            })?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| DripflowError::Channel {
                message: format!("failed to build SMTP transport for {}: {e}", config.smtp_host),
                source: Some(Box::new(e)),
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(address.to_string(), password.to_string()))
            .build();

        debug!(host = %config.smtp_host, port = config.smtp_port, "email channel initialized");
        Ok(Self { mailer, sender })
    }
}

#[async_trait]
impl ChannelClient for EmailChannel {
    fn platform(&self) -> Platform {
        Platform::Email
    }

    fn name(&self) -> &str {
        "email"
    }

    async fn publish(&self, content: &OutboundContent) -> Result<PostId, DripflowError> {
        let OutboundContent::Email { to, subject, html_body } = content else {
            return Err(DripflowError::Channel {
                message: "email channel requires addressed email content".into(),
                source: None,
            });
        };

        let recipient: Mailbox = to.parse().map_err(|e| DripflowError::Channel {
            message: format!("invalid recipient address `{to}`: {e}"),
            source: None,
        })?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.clone())
            .map_err(|e| DripflowError::Channel {
                message: format!("failed to build message: {e}"),
                source: Some(Box::new(e)),
            })?;

        let response = self.mailer.send(message).await.map_err(|e| DripflowError::Channel {
            message: format!("SMTP send to {to} failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        info!(to = %to, code = %response.code(), "email accepted by relay");
        Ok(PostId(response.code().to_string()))
    }

    async fn fetch_metrics(&self, _post_id: &str) -> Result<PostMetrics, DripflowError> {
        Err(DripflowError::Channel {
            message: "email channel does not expose post metrics".into(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_creds() -> EmailConfig {
        EmailConfig {
            address: Some("outreach@example.com".into()),
            password: Some("app-password".into()),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn new_requires_address() {
        let config = EmailConfig {
            password: Some("pw".into()),
            ..EmailConfig::default()
        };
        assert!(EmailChannel::new(&config).is_err());
    }

    #[test]
    fn new_requires_password() {
        let config = EmailConfig {
            address: Some("outreach@example.com".into()),
            ..EmailConfig::default()
        };
        assert!(EmailChannel::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_credentials() {
        let config = EmailConfig {
            address: Some(String::new()),
            password: Some("pw".into()),
            ..EmailConfig::default()
        };
        assert!(EmailChannel::new(&config).is_err());
    }

    #[test]
    fn new_accepts_full_credentials() {
        assert!(EmailChannel::new(&config_with_creds()).is_ok());
    }

    #[tokio::test]
    async fn publish_rejects_social_content_locally() {
        let channel = EmailChannel::new(&config_with_creds()).unwrap();
        let result = channel
            .publish(&OutboundContent::Social { text: "hi".into(), media: None })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn publish_rejects_malformed_recipient_locally() {
        let channel = EmailChannel::new(&config_with_creds()).unwrap();
        let result = channel
            .publish(&OutboundContent::Email {
                to: "not an address".into(),
                subject: "s".into(),
                html_body: "<p>b</p>".into(),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fetch_metrics_is_unsupported() {
        let channel = EmailChannel::new(&config_with_creds()).unwrap();
        assert!(channel.fetch_metrics("any").await.is_err());
    }
}
