//! Email notifications sent by workflow transitions

pub mod log;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

pub use self::log::LogNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to deliver notification to {recipient}: {reason}")]
    Delivery { recipient: String, reason: String },
    #[error("notification has no recipient")]
    MissingRecipient,
}

/// Template arguments for each notification the workflow sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent to the review team once an intake is submitted
    IntakeSubmitted {
        intake_id: Uuid,
        requester: String,
        owner: String,
    },
    /// Sent to the requester with the reviewer's decision text
    IntakeReviewed {
        intake_id: Uuid,
        recipient: String,
        body: String,
    },
}

impl Notification {
    pub fn intake_id(&self) -> Uuid {
        match self {
            Notification::IntakeSubmitted { intake_id, .. }
            | Notification::IntakeReviewed { intake_id, .. } => *intake_id,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notification::IntakeSubmitted { requester, .. } => {
                format!("New intake request: {requester}")
            }
            Notification::IntakeReviewed { .. } => "Your intake request has been reviewed".to_string(),
        }
    }

    pub fn body(&self, app_url: &str) -> String {
        match self {
            Notification::IntakeSubmitted {
                intake_id,
                requester,
                owner,
            } => format!(
                "{requester} ({owner}) submitted a new system intake.\n\
                 Review it at {}/governance-review-team/{intake_id}/intake-request",
                app_url.trim_end_matches('/')
            ),
            Notification::IntakeReviewed { body, .. } => body.clone(),
        }
    }
}

/// Notification collaborator consumed by the workflow
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
