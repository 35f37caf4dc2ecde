//! Acting principals and the authorization gate

pub mod gate;

use std::fmt::Debug;

use crate::errors::WorkflowError;

pub use gate::{authorize_requester, authorize_reviewer};

/// The authenticated actor performing a request
pub trait Principal: Debug + Send + Sync {
    /// User identity, e.g. an EUA id
    fn id(&self) -> &str;

    /// Whether the principal may use the application at all
    fn allows_access(&self) -> bool;

    /// Whether the principal holds the governance reviewer capability
    fn is_reviewer(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrincipal {
    pub id: String,
    pub access: bool,
    pub reviewer: bool,
}

impl UserPrincipal {
    pub fn requester(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            access: true,
            reviewer: false,
        }
    }

    pub fn reviewer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            access: true,
            reviewer: true,
        }
    }
}

impl Principal for UserPrincipal {
    fn id(&self) -> &str {
        &self.id
    }

    fn allows_access(&self) -> bool {
        self.access
    }

    fn is_reviewer(&self) -> bool {
        self.reviewer
    }
}

/// Builds principals from identity-provider claims (user id + job codes)
#[derive(Debug, Clone)]
pub struct PrincipalResolver {
    user_job_code: String,
    reviewer_job_code: String,
}

impl PrincipalResolver {
    pub fn new(user_job_code: impl Into<String>, reviewer_job_code: impl Into<String>) -> Self {
        Self {
            user_job_code: user_job_code.into(),
            reviewer_job_code: reviewer_job_code.into(),
        }
    }

    pub fn resolve(
        &self,
        user_id: Option<&str>,
        job_codes: &[String],
    ) -> Result<UserPrincipal, WorkflowError> {
        let id = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(WorkflowError::Context {
                operation: "get",
                object: "user id",
            })?;

        let has = |code: &str| job_codes.iter().any(|c| c.eq_ignore_ascii_case(code));
        Ok(UserPrincipal {
            id: id.to_uppercase(),
            access: has(&self.user_job_code),
            reviewer: has(&self.reviewer_job_code),
        })
    }
}
