//! Intake transition engine
//!
//! An update request carries the desired state of an intake. The dispatcher
//! fetches the stored intake, classifies the status change against the
//! transition table and runs the matching handler. Each handler authorizes
//! the principal, mutates the record, calls its external collaborators in a
//! fixed order, persists, and optionally notifies.
//!
//! Nothing here is transactional across collaborators. Submit calls the
//! external API before persisting, and Archive writes the business case
//! before the intake; a failure between those steps leaves the earlier effect
//! in place and is reported to the caller.

mod archive;
mod business_case;
mod decide;
mod dispatcher;
mod intake;
mod submit;
mod transitions;
mod update_draft;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tracing::Span;

use crate::auth::Principal;
use crate::clock::{Clock, SystemClock};
use crate::external::{DirectoryApi, SubmissionApi};
use crate::notify::Notifier;
use crate::store::IntakeStore;
use crate::telemetry::{create_request_span, generate_correlation_id};
use crate::validation::{IntakeValidator, RequiredFieldsValidator};

pub use transitions::{classify, Transition, TRANSITION_TABLE};

/// Per-request inputs every workflow operation takes explicitly: who is
/// acting, and where its log events go
#[derive(Debug, Clone)]
pub struct RequestContext {
    principal: Arc<dyn Principal>,
    span: Span,
    correlation_id: String,
}

impl RequestContext {
    pub fn new(principal: impl Principal + 'static) -> Self {
        let correlation_id = generate_correlation_id();
        let span = create_request_span(principal.id(), &correlation_id);
        Self {
            principal: Arc::new(principal),
            span,
            correlation_id,
        }
    }

    pub fn principal(&self) -> &dyn Principal {
        self.principal.as_ref()
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Everything outside the engine that a transition may call
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn IntakeStore>,
    pub submission: Arc<dyn SubmissionApi>,
    pub directory: Arc<dyn DirectoryApi>,
    pub notifier: Arc<dyn Notifier>,
    pub validator: Arc<dyn IntakeValidator>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Production validator and system clock around the given services
    pub fn new(
        store: Arc<dyn IntakeStore>,
        submission: Arc<dyn SubmissionApi>,
        directory: Arc<dyn DirectoryApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            submission,
            directory,
            notifier,
            validator: Arc::new(RequiredFieldsValidator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn IntakeValidator>) -> Self {
        self.validator = validator;
        self
    }
}

/// The intake workflow service. Holds no mutable state of its own; all
/// durable state lives in the store.
#[derive(Clone)]
pub struct IntakeWorkflow {
    store: Arc<dyn IntakeStore>,
    submission: Arc<dyn SubmissionApi>,
    directory: Arc<dyn DirectoryApi>,
    notifier: Arc<dyn Notifier>,
    validator: Arc<dyn IntakeValidator>,
    clock: Arc<dyn Clock>,
}

impl IntakeWorkflow {
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            store,
            submission,
            directory,
            notifier,
            validator,
            clock,
        } = collaborators;
        Self {
            store,
            submission,
            directory,
            notifier,
            validator,
            clock,
        }
    }
}
