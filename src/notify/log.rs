// Notifier that writes rendered emails to the log instead of sending them

use async_trait::async_trait;
use tracing::info;

use super::{Notification, Notifier, NotifyError};

#[derive(Debug, Clone)]
pub struct LogNotifier {
    review_team_address: String,
    app_url: String,
}

impl LogNotifier {
    pub fn new(review_team_address: impl Into<String>, app_url: impl Into<String>) -> Self {
        Self {
            review_team_address: review_team_address.into(),
            app_url: app_url.into(),
        }
    }

    fn recipient<'a>(&'a self, notification: &'a Notification) -> &'a str {
        match notification {
            Notification::IntakeSubmitted { .. } => &self.review_team_address,
            Notification::IntakeReviewed { recipient, .. } => recipient,
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let recipient = self.recipient(notification);
        if recipient.trim().is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        info!(
            intake_id = %notification.intake_id(),
            to = %recipient,
            subject = %notification.subject(),
            body = %notification.body(&self.app_url),
            "Email notification"
        );
        Ok(())
    }
}
