// Intake Workflow Library - system intake approval transitions
// This exposes the workflow engine and its collaborators for embedding and testing

pub mod auth;
pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod external;
pub mod http;
pub mod models;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod workflow;

// Re-export key types for easy access
pub use auth::{Principal, PrincipalResolver, UserPrincipal};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::IntakeWorkflowConfig;
pub use errors::{ErrorKind, ValidationError, WorkflowError};
pub use external::{ClientError, DirectoryApi, SubmissionApi, SubmissionReceipt};
pub use http::RateLimitedHttpClient;
pub use models::{BusinessCase, BusinessCaseStatus, IntakeStatus, SystemIntake};
pub use notify::{Notification, Notifier, NotifyError};
pub use store::{FileStore, IntakeStore, MemoryStore, StoreError};
pub use telemetry::{create_request_span, generate_correlation_id, init_telemetry};
pub use validation::{IntakeValidator, RequiredFieldsValidator};
pub use workflow::{
    classify, Collaborators, IntakeWorkflow, RequestContext, Transition, TRANSITION_TABLE,
};
