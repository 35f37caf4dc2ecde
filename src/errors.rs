// Error taxonomy for workflow operations
//
// Collaborator failures (store, external APIs, notifier) have their own error
// types; WorkflowError wraps them with the operation and record involved.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::external::ClientError;
use crate::models::{BusinessCase, SystemIntake};
use crate::notify::NotifyError;
use crate::store::StoreError;

/// Storage operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation {
    Fetch,
    Create,
    Save,
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperation::Fetch => f.write_str("fetch"),
            QueryOperation::Create => f.write_str("create"),
            QueryOperation::Save => f.write_str("save"),
        }
    }
}

/// Operation attempted against an external system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOperation {
    Submit,
    FetchEmail,
}

impl fmt::Display for ExternalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalOperation::Submit => f.write_str("submit"),
            ExternalOperation::FetchEmail => f.write_str("fetch email address"),
        }
    }
}

/// External system an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalSource {
    SubmissionApi,
    Directory,
}

impl ExternalSource {
    pub fn name(&self) -> &'static str {
        match self {
            ExternalSource::SubmissionApi => "intake submission API",
            ExternalSource::Directory => "user directory",
        }
    }
}

impl fmt::Display for ExternalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The record a storage error concerns.
///
/// Failed fetches only know the identifier; failed writes carry the record
/// that was being written.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRef {
    IntakeId(Uuid),
    Intake(Box<SystemIntake>),
    IntakesForOwner(String),
    BusinessCaseId(Uuid),
    BusinessCase(Box<BusinessCase>),
    BusinessCasesForOwner(String),
}

impl ModelRef {
    pub fn intake(intake: &SystemIntake) -> Self {
        ModelRef::Intake(Box::new(intake.clone()))
    }

    pub fn business_case(business_case: &BusinessCase) -> Self {
        ModelRef::BusinessCase(Box::new(business_case.clone()))
    }

    pub fn id(&self) -> String {
        match self {
            ModelRef::IntakeId(id) | ModelRef::BusinessCaseId(id) => id.to_string(),
            ModelRef::Intake(intake) => intake.id.to_string(),
            ModelRef::BusinessCase(business_case) => business_case.id.to_string(),
            ModelRef::IntakesForOwner(owner) | ModelRef::BusinessCasesForOwner(owner) => {
                owner.clone()
            }
        }
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRef::IntakeId(_) | ModelRef::Intake(_) => write!(f, "system intake {}", self.id()),
            ModelRef::IntakesForOwner(owner) => write!(f, "system intakes for {owner}"),
            ModelRef::BusinessCasesForOwner(owner) => write!(f, "business cases for {owner}"),
            ModelRef::BusinessCaseId(_) | ModelRef::BusinessCase(_) => {
                write!(f, "business case {}", self.id())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every field that failed completeness rules, in check order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub model_id: String,
    pub validations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            validations: Vec::new(),
        }
    }

    pub fn with_validation(&mut self, field: &str, message: &str) {
        self.validations.push(FieldViolation {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.validations.iter().map(|v| v.field.as_str()).collect()
    }

    /// `Ok(())` when nothing failed, otherwise the collected error
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed for {}", self.model_id)?;
        for (index, violation) in self.validations.iter().enumerate() {
            let separator = if index == 0 { ": " } else { ", " };
            write!(f, "{separator}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Flat classification of [`WorkflowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Context,
    Validation,
    Conflict,
    Query,
    ExternalApi,
    Notification,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("unauthorized to {operation}")]
    Unauthorized { operation: &'static str },

    #[error("unable to {operation} {object} from the request context")]
    Context {
        operation: &'static str,
        object: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("conflict on {resource_id}: {reason}")]
    Conflict { resource_id: String, reason: String },

    #[error("could not {operation} {model}: {source}")]
    Query {
        operation: QueryOperation,
        model: ModelRef,
        source: StoreError,
    },

    #[error("{source_system} failed to {operation} for {model_id}: {source}")]
    ExternalApi {
        source_system: ExternalSource,
        operation: ExternalOperation,
        model_id: String,
        source: ClientError,
    },

    #[error("system intake {intake_id} was saved but the notification failed: {source}")]
    Notification { intake_id: Uuid, source: NotifyError },
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Unauthorized { .. } => ErrorKind::Unauthorized,
            WorkflowError::Context { .. } => ErrorKind::Context,
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::Conflict { .. } => ErrorKind::Conflict,
            WorkflowError::Query { .. } => ErrorKind::Query,
            WorkflowError::ExternalApi { .. } => ErrorKind::ExternalApi,
            WorkflowError::Notification { .. } => ErrorKind::Notification,
        }
    }

    pub fn conflict(resource_id: impl ToString, reason: impl Into<String>) -> Self {
        WorkflowError::Conflict {
            resource_id: resource_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn query(operation: QueryOperation, model: ModelRef, source: StoreError) -> Self {
        WorkflowError::Query {
            operation,
            model,
            source,
        }
    }

    /// Map a failed write. A stale version means another writer got there
    /// first, which callers see as a conflict rather than a storage fault.
    pub fn from_save(model: ModelRef, source: StoreError) -> Self {
        match source {
            StoreError::Stale { id, .. } => WorkflowError::conflict(
                id,
                "record was modified by another request; fetch it again and retry",
            ),
            source => WorkflowError::query(QueryOperation::Save, model, source),
        }
    }

    pub fn external(
        source_system: ExternalSource,
        operation: ExternalOperation,
        model_id: impl ToString,
        source: ClientError,
    ) -> Self {
        WorkflowError::ExternalApi {
            source_system,
            operation,
            model_id: model_id.to_string(),
            source,
        }
    }
}
