// Recording fakes for the workflow collaborators - no network, no disk
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use intake_workflow::external::{ClientError, DirectoryApi, SubmissionApi, SubmissionReceipt};
use intake_workflow::notify::{Notification, Notifier, NotifyError};
use intake_workflow::{
    Collaborators, FixedClock, IntakeStore, IntakeWorkflow, MemoryStore, RequestContext,
    SystemIntake, UserPrincipal,
};

/// Submission API fake that hands out queued receipts and records calls
#[derive(Debug, Default)]
pub struct RecordingSubmissionApi {
    pub submitted: Mutex<Vec<SystemIntake>>,
    receipts: Mutex<VecDeque<SubmissionReceipt>>,
    barrier: Option<Arc<Barrier>>,
}

impl RecordingSubmissionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_references(references: &[&str]) -> Self {
        let api = Self::new();
        for reference in references {
            api.push_receipt(SubmissionReceipt::success(*reference));
        }
        api
    }

    /// Hold every call until `barrier` is released by all parties
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn push_receipt(&self, receipt: SubmissionReceipt) {
        self.receipts.lock().unwrap().push_back(receipt);
    }

    pub fn call_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmissionApi for RecordingSubmissionApi {
    async fn submit_intake(&self, intake: &SystemIntake) -> Result<SubmissionReceipt, ClientError> {
        self.submitted.lock().unwrap().push(intake.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.receipts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::Rejected {
                message: "no receipt queued".to_string(),
            })
    }
}

/// Directory fake with a fixed answer for every user
#[derive(Debug)]
pub struct RecordingDirectory {
    pub email: String,
    pub lookups: Mutex<Vec<String>>,
}

impl RecordingDirectory {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryApi for RecordingDirectory {
    async fn lookup_email(&self, user_id: &str) -> Result<String, ClientError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        Ok(self.email.clone())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::Delivery {
                recipient: "review team".to_string(),
                reason: "mail relay unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// A workflow over an in-memory store with handles on every fake
pub struct Harness {
    pub workflow: IntakeWorkflow,
    pub store: Arc<MemoryStore>,
    pub submission: Arc<RecordingSubmissionApi>,
    pub directory: Arc<RecordingDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            RecordingSubmissionApi::with_references(&["ALF-42"]),
            RecordingNotifier::new(),
        )
    }

    pub fn with(submission: RecordingSubmissionApi, notifier: RecordingNotifier) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), submission, notifier)
    }

    pub fn with_store(
        store: Arc<MemoryStore>,
        submission: RecordingSubmissionApi,
        notifier: RecordingNotifier,
    ) -> Self {
        let submission = Arc::new(submission);
        let directory = Arc::new(RecordingDirectory::new("u1@example.com"));
        let notifier = Arc::new(notifier);
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));

        let workflow = IntakeWorkflow::new(
            Collaborators::new(
                store.clone(),
                submission.clone(),
                directory.clone(),
                notifier.clone(),
            )
            .with_clock(clock.clone()),
        );

        Self {
            workflow,
            store,
            submission,
            directory,
            notifier,
            clock,
        }
    }

    pub fn with_directory(mut self, directory: RecordingDirectory) -> Self {
        let directory = Arc::new(directory);
        let collaborators = Collaborators::new(
            self.store.clone(),
            self.submission.clone(),
            directory.clone(),
            self.notifier.clone(),
        )
        .with_clock(self.clock.clone());
        self.workflow = IntakeWorkflow::new(collaborators);
        self.directory = directory;
        self
    }

    /// Create a draft through the workflow and fill in every required field
    pub async fn complete_draft(&self, owner: &str) -> SystemIntake {
        let created = self
            .workflow
            .create_intake(&requester(owner), SystemIntake::default())
            .await
            .unwrap();
        SystemIntake {
            requester: "Jane Requester".to_string(),
            component: Some("OIT".to_string()),
            business_owner: Some("Bo Owner".to_string()),
            business_owner_component: Some("OIT".to_string()),
            product_manager: Some("Pat Manager".to_string()),
            product_manager_component: Some("OIT".to_string()),
            project_name: Some("Easy Access".to_string()),
            existing_funding: Some(true),
            funding_source: Some("123456".to_string()),
            business_need: Some("A need".to_string()),
            solution: Some("A solution".to_string()),
            process_status: Some("Just an idea".to_string()),
            ea_support_request: Some(false),
            existing_contract: Some("No".to_string()),
            ..created
        }
    }

    pub async fn stored(&self, intake: &SystemIntake) -> SystemIntake {
        self.store.fetch_intake(intake.id).await.unwrap()
    }
}

pub fn requester(id: &str) -> RequestContext {
    RequestContext::new(UserPrincipal::requester(id))
}

pub fn reviewer(id: &str) -> RequestContext {
    RequestContext::new(UserPrincipal::reviewer(id))
}
