// Stand-ins for the external systems when running in the local environment

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{ClientError, DirectoryApi, SubmissionApi, SubmissionReceipt};
use crate::models::SystemIntake;

/// Accepts every submission and mints a `LOCAL-` reference
#[derive(Debug, Default)]
pub struct LocalSubmissionApi;

#[async_trait]
impl SubmissionApi for LocalSubmissionApi {
    async fn submit_intake(&self, intake: &SystemIntake) -> Result<SubmissionReceipt, ClientError> {
        let simple = Uuid::new_v4().simple().to_string();
        let reference = format!("LOCAL-{}", &simple[..8]);
        info!(intake_id = %intake.id, reference = %reference, "Local submission accepted");
        Ok(SubmissionReceipt::success(reference))
    }
}

/// Derives an address from the user id
#[derive(Debug)]
pub struct LocalDirectoryApi {
    domain: String,
}

impl LocalDirectoryApi {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

#[async_trait]
impl DirectoryApi for LocalDirectoryApi {
    async fn lookup_email(&self, user_id: &str) -> Result<String, ClientError> {
        if user_id.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}@{}", user_id.to_lowercase(), self.domain))
    }
}
