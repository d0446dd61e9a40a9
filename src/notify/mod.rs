// src/notify/mod.rs
pub mod email;

use chrono::NaiveDate;

use crate::error::DeliveryError;

pub use email::EmailSender;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DeliveryError>;
    fn name(&self) -> &'static str;
}

pub fn subject_for(date: NaiveDate) -> String {
    format!("Daily Realtor Update: {}", date.format("%Y-%m-%d"))
}

/// Send the digest. Delivery failure is logged and swallowed; the report was
/// already printed. Returns whether the message went out.
pub async fn deliver(notifier: &dyn Notifier, body: &str, date: NaiveDate) -> bool {
    let subject = subject_for(date);
    tracing::info!(notifier = notifier.name(), %subject, "sending digest");
    match notifier.send(&subject, body).await {
        Ok(()) => {
            tracing::info!(notifier = notifier.name(), "digest sent");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, notifier = notifier.name(), "unable to send digest");
            false
        }
    }
}
