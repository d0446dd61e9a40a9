use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{Address, AsyncTransport, Tokio1Executor};

use super::Notifier;
use crate::config::Config;
use crate::error::DeliveryError;

/// STARTTLS SMTP sender. No pooling: every send opens its own connection and
/// lettre closes it on both the success and the failure path.
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    /// Builds the transport only; nothing connects until `send`.
    pub fn from_config(cfg: &Config) -> Result<Self, DeliveryError> {
        let smtp = &cfg.smtp;

        let from_addr: Address =
            smtp.from_email
                .parse()
                .map_err(|source| DeliveryError::Address {
                    value: smtp.from_email.clone(),
                    source,
                })?;
        let from = Mailbox::new(Some(smtp.from_name.clone()), from_addr);
        let to: Mailbox =
            cfg.destination_email
                .parse()
                .map_err(|source| DeliveryError::Address {
                    value: cfg.destination_email.clone(),
                    source,
                })?;

        let creds = Credentials::new(smtp.user.clone(), smtp.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)?
            .port(smtp.port)
            .credentials(creds)
            .timeout(Some(smtp.timeout))
            .build();

        Ok(Self { mailer, from, to })
    }

    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message, DeliveryError> {
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        Ok(msg)
    }
}

#[async_trait::async_trait]
impl Notifier for EmailSender {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let msg = self.build_message(subject, body)?;
        self.mailer.send(msg).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
