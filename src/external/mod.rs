//! External system abstractions
//!
//! The workflow talks to two outside systems: the intake submission API that
//! assigns external references, and the user directory that resolves a user
//! id to an email address. Both sit behind traits so handlers can be tested
//! without network access.

pub mod directory;
pub mod local;
pub mod submission;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::models::SystemIntake;

pub use directory::HttpDirectoryClient;
pub use local::{LocalDirectoryApi, LocalSubmissionApi};
pub use submission::HttpSubmissionClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("invalid request URL: {0}")]
    Url(String),
    #[error("{message}")]
    Rejected { message: String },
}

/// Result reported by the submission API for one intake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub result: String,
    pub messages: Vec<String>,
}

impl SubmissionReceipt {
    pub const SUCCESS: &'static str = "success";

    pub fn success(reference: impl Into<String>) -> Self {
        Self {
            result: Self::SUCCESS.to_string(),
            messages: vec![reference.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == Self::SUCCESS
    }

    /// External reference carried by a successful receipt, if non-empty
    pub fn reference(&self) -> Option<&str> {
        self.messages
            .first()
            .map(|message| message.trim())
            .filter(|message| !message.is_empty())
    }
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SubmissionApi: Send + Sync {
    async fn submit_intake(&self, intake: &SystemIntake) -> Result<SubmissionReceipt, ClientError>;
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Resolve a user id to an email address; an empty string means unknown
    async fn lookup_email(&self, user_id: &str) -> Result<String, ClientError>;
}
