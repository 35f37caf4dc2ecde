// Mock collaborators for the handler unit tests

use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, LazyLock};

use super::{Collaborators, IntakeWorkflow, RequestContext};
use crate::auth::UserPrincipal;
use crate::clock::FixedClock;
use crate::external::{MockDirectoryApi, MockSubmissionApi};
use crate::models::{IntakeStatus, SystemIntake};
use crate::notify::MockNotifier;
use crate::store::{MockIntakeStore, StoreError};
use crate::validation::MockIntakeValidator;

pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());

pub struct Mocks {
    pub store: MockIntakeStore,
    pub submission: MockSubmissionApi,
    pub directory: MockDirectoryApi,
    pub notifier: MockNotifier,
    pub validator: MockIntakeValidator,
}

impl Mocks {
    pub fn new() -> Self {
        Self {
            store: MockIntakeStore::new(),
            submission: MockSubmissionApi::new(),
            directory: MockDirectoryApi::new(),
            notifier: MockNotifier::new(),
            validator: MockIntakeValidator::new(),
        }
    }

    pub fn workflow(self) -> IntakeWorkflow {
        IntakeWorkflow::new(Collaborators {
            store: Arc::new(self.store),
            submission: Arc::new(self.submission),
            directory: Arc::new(self.directory),
            notifier: Arc::new(self.notifier),
            validator: Arc::new(self.validator),
            clock: Arc::new(FixedClock::new(*NOW)),
        })
    }
}

/// Stand-in for a store save: bump the version and hand the record back
pub fn echo_save(intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
    let mut saved = intake.clone();
    saved.version += 1;
    Ok(saved)
}

pub fn requester_ctx(id: &str) -> RequestContext {
    RequestContext::new(UserPrincipal::requester(id))
}

pub fn reviewer_ctx(id: &str) -> RequestContext {
    RequestContext::new(UserPrincipal::reviewer(id))
}

pub fn complete_draft(owner: &str) -> SystemIntake {
    SystemIntake {
        component: Some("OIT".to_string()),
        business_owner: Some("Bo Owner".to_string()),
        business_owner_component: Some("OIT".to_string()),
        product_manager: Some("Pat Manager".to_string()),
        product_manager_component: Some("OIT".to_string()),
        project_name: Some("Easy Access".to_string()),
        existing_funding: Some(false),
        business_need: Some("A need".to_string()),
        solution: Some("A solution".to_string()),
        process_status: Some("Just an idea".to_string()),
        ea_support_request: Some(false),
        existing_contract: Some("No".to_string()),
        created_at: Some(*NOW - chrono::Duration::days(1)),
        version: 3,
        ..SystemIntake::new_draft(owner, "Jane Requester")
    }
}

pub fn submitted(owner: &str, reference: &str) -> SystemIntake {
    SystemIntake {
        status: IntakeStatus::Submitted,
        submitted_at: Some(*NOW - chrono::Duration::hours(2)),
        external_reference: Some(reference.to_string()),
        ..complete_draft(owner)
    }
}
