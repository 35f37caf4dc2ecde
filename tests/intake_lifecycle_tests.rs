//! End-to-end transitions over the in-memory store
//!
//! Every test drives the public workflow API with recording fakes for the
//! submission API, directory and notifier.

mod fixtures;

use fixtures::{requester, reviewer, Harness, RecordingDirectory, RecordingNotifier, RecordingSubmissionApi};
use intake_workflow::models::{BusinessCase, BusinessCaseStatus};
use intake_workflow::notify::Notification;
use intake_workflow::{ErrorKind, IntakeStatus, IntakeStore, SystemIntake, WorkflowError};

#[tokio::test]
async fn test_draft_to_approved() {
    let harness = Harness::new();
    let draft = harness.complete_draft("U1").await;

    let updated = harness
        .workflow
        .update_intake(&requester("U1"), draft.clone())
        .await
        .unwrap();
    assert_eq!(updated.status, IntakeStatus::Draft);
    assert_eq!(updated.project_name.as_deref(), Some("Easy Access"));

    let mut submit = updated.clone();
    submit.status = IntakeStatus::Submitted;
    let submitted = harness
        .workflow
        .update_intake(&requester("U1"), submit)
        .await
        .unwrap();

    assert_eq!(submitted.status, IntakeStatus::Submitted);
    assert_eq!(submitted.external_reference.as_deref(), Some("ALF-42"));
    assert!(submitted.submitted_at.is_some());
    assert_eq!(harness.submission.call_count(), 1);
    assert!(matches!(
        harness.notifier.sent().as_slice(),
        [Notification::IntakeSubmitted { owner, .. }] if owner == "U1"
    ));

    harness.clock.advance(chrono::Duration::hours(4));
    let mut decision = submitted.clone();
    decision.status = IntakeStatus::Approved;
    decision.decision_message = Some("Approved with conditions".to_string());
    let decided = harness
        .workflow
        .update_intake(&reviewer("GRT1"), decision)
        .await
        .unwrap();

    assert_eq!(decided.status, IntakeStatus::Approved);
    assert_eq!(decided.decision_message.as_deref(), Some("Approved with conditions"));
    assert_eq!(decided.requester_email_address.as_deref(), Some("u1@example.com"));
    assert_eq!(decided.submitted_at, submitted.submitted_at);
    assert!(decided.decided_at > decided.submitted_at);
    assert_eq!(harness.directory.lookups(), vec!["U1".to_string()]);

    let stored = harness.stored(&decided).await;
    assert_eq!(stored, decided);
}

#[tokio::test]
async fn test_resubmission_is_conflict_and_api_called_once() {
    let harness = Harness::new();
    let mut draft = harness.complete_draft("U1").await;
    draft.status = IntakeStatus::Submitted;

    let submitted = harness
        .workflow
        .update_intake(&requester("U1"), draft)
        .await
        .unwrap();

    let err = harness
        .workflow
        .update_intake(&requester("U1"), submitted.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(harness.submission.call_count(), 1);
    assert_eq!(harness.stored(&submitted).await, submitted);
}

#[tokio::test]
async fn test_incomplete_submission_lists_every_missing_field() {
    let harness = Harness::new();
    let created = harness
        .workflow
        .create_intake(&requester("U1"), SystemIntake::default())
        .await
        .unwrap();

    let mut submit = created.clone();
    submit.status = IntakeStatus::Submitted;
    let err = harness
        .workflow
        .update_intake(&requester("U1"), submit)
        .await
        .unwrap_err();

    let WorkflowError::Validation(validation) = err else {
        panic!("expected a validation error");
    };
    assert!(validation.fields().len() > 1);
    for field in ["Requester", "ProjectName", "BusinessNeed", "ExistingFunding"] {
        assert!(validation.fields().contains(&field), "missing {field}");
    }
    assert_eq!(harness.submission.call_count(), 0);
    assert_eq!(harness.stored(&created).await.status, IntakeStatus::Draft);
}

#[tokio::test]
async fn test_notification_failure_keeps_submitted_record() {
    let harness = Harness::with(
        RecordingSubmissionApi::with_references(&["ALF-42"]),
        RecordingNotifier::failing(),
    );
    let mut draft = harness.complete_draft("U1").await;
    draft.status = IntakeStatus::Submitted;

    let err = harness
        .workflow
        .update_intake(&requester("U1"), draft.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Notification);

    let stored = harness.stored(&draft).await;
    assert_eq!(stored.status, IntakeStatus::Submitted);
    assert_eq!(stored.external_reference.as_deref(), Some("ALF-42"));
}

#[tokio::test]
async fn test_empty_directory_address_leaves_record_unchanged() {
    let harness = Harness::new().with_directory(RecordingDirectory::new(""));
    let mut draft = harness.complete_draft("U1").await;
    draft.status = IntakeStatus::Submitted;
    let submitted = harness
        .workflow
        .update_intake(&requester("U1"), draft)
        .await
        .unwrap();

    let mut decision = submitted.clone();
    decision.status = IntakeStatus::Approved;
    let err = harness
        .workflow
        .update_intake(&reviewer("GRT1"), decision)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExternalApi);
    assert!(err.to_string().contains("user directory"));
    assert_eq!(harness.stored(&submitted).await, submitted);
}

#[tokio::test]
async fn test_requester_cannot_edit_someone_elses_draft() {
    let harness = Harness::new();
    let draft = harness.complete_draft("U1").await;

    let err = harness
        .workflow
        .update_intake(&requester("U2"), draft)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_archive_cascades_to_business_case() {
    let harness = Harness::new();
    let draft = harness.complete_draft("U1").await;

    let business_case = harness
        .workflow
        .create_business_case(
            &requester("U1"),
            BusinessCase {
                system_intake_id: draft.id,
                project_name: Some("Easy Access".to_string()),
                requester: Some("Jane Requester".to_string()),
                business_owner: Some("Bo Owner".to_string()),
                business_need: Some("A need".to_string()),
                ..BusinessCase::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(harness.stored(&draft).await.business_case_id, Some(business_case.id));

    let archived = harness
        .workflow
        .archive_intake(&requester("U1"), draft.id)
        .await
        .unwrap();
    assert_eq!(archived.status, IntakeStatus::Archived);
    assert!(archived.archived_at.is_some());

    let stored_case = harness.store.fetch_business_case(business_case.id).await.unwrap();
    assert_eq!(stored_case.status, BusinessCaseStatus::Archived);
    assert_eq!(stored_case.archived_at, archived.archived_at);

    // Archived is terminal
    let mut reopen = archived.clone();
    reopen.status = IntakeStatus::Draft;
    let err = harness
        .workflow
        .update_intake(&requester("U1"), reopen)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_archive_with_missing_business_case_aborts() {
    let harness = Harness::new();
    let draft = harness.complete_draft("U1").await;

    // Link to a business case the store has never seen
    let mut linked = harness.stored(&draft).await;
    linked.business_case_id = Some(uuid::Uuid::new_v4());
    let linked = harness.store.save_intake(&linked).await.unwrap();

    let err = harness
        .workflow
        .archive_intake(&requester("U1"), draft.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(harness.stored(&draft).await, linked);
}

#[tokio::test]
async fn test_list_returns_only_owned_intakes() {
    let harness = Harness::new();
    harness.complete_draft("U1").await;
    harness.complete_draft("U1").await;
    harness.complete_draft("U2").await;

    let owned = harness
        .workflow
        .fetch_intakes_by_owner(&requester("U1"), "U1")
        .await
        .unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|intake| intake.eua_user_id == "U1"));
}

#[tokio::test]
async fn test_decision_fields_only_written_by_a_decision() {
    let harness = Harness::new();
    let mut draft = harness.complete_draft("U1").await;
    draft.decision_message = Some("Approved (forged)".to_string());
    draft.requester_email_address = Some("attacker@evil.example".to_string());

    let updated = harness
        .workflow
        .update_intake(&requester("U1"), draft)
        .await
        .unwrap();
    assert_eq!(updated.decision_message, None);
    assert_eq!(updated.requester_email_address, None);

    let mut submit = updated.clone();
    submit.status = IntakeStatus::Submitted;
    submit.decision_message = Some("Approved (forged)".to_string());
    submit.requester_email_address = Some("attacker@evil.example".to_string());
    let submitted = harness
        .workflow
        .update_intake(&requester("U1"), submit)
        .await
        .unwrap();

    assert_eq!(submitted.status, IntakeStatus::Submitted);
    assert_eq!(submitted.decision_message, None);
    assert_eq!(submitted.requester_email_address, None);
    assert_eq!(submitted.decided_at, None);
    assert_eq!(harness.stored(&submitted).await, submitted);
}

fn business_case_for(intake: &SystemIntake) -> BusinessCase {
    BusinessCase {
        system_intake_id: intake.id,
        project_name: Some("Easy Access".to_string()),
        requester: Some("Jane Requester".to_string()),
        business_owner: Some("Bo Owner".to_string()),
        business_need: Some("A need".to_string()),
        ..BusinessCase::default()
    }
}

#[tokio::test]
async fn test_business_cases_listed_by_owner() {
    let harness = Harness::new();
    let first = harness.complete_draft("U1").await;
    let second = harness.complete_draft("U1").await;
    let other = harness.complete_draft("U2").await;

    for (owner, intake) in [("U1", &first), ("U1", &second), ("U2", &other)] {
        harness
            .workflow
            .create_business_case(&requester(owner), business_case_for(intake))
            .await
            .unwrap();
    }

    let owned = harness
        .workflow
        .fetch_business_cases_by_owner(&requester("U1"), "U1")
        .await
        .unwrap();
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|business_case| business_case.eua_user_id == "U1"));
    assert!(owned.iter().any(|business_case| business_case.system_intake_id == first.id));
    assert!(owned.iter().any(|business_case| business_case.system_intake_id == second.id));
}

#[tokio::test]
async fn test_unlinked_business_case_blocks_second_create_until_archived() {
    let harness = Harness::new();
    let draft = harness.complete_draft("U1").await;

    // A case whose intake link was never written
    let unlinked = harness
        .store
        .create_business_case(&BusinessCase {
            id: uuid::Uuid::new_v4(),
            eua_user_id: "U1".to_string(),
            ..business_case_for(&draft)
        })
        .await
        .unwrap();

    let err = harness
        .workflow
        .create_business_case(&requester("U1"), business_case_for(&draft))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(harness.stored(&draft).await.business_case_id, None);

    harness
        .workflow
        .archive_business_case(&requester("U1"), unlinked.id)
        .await
        .unwrap();
    let created = harness
        .workflow
        .create_business_case(&requester("U1"), business_case_for(&draft))
        .await
        .unwrap();
    assert_eq!(harness.stored(&draft).await.business_case_id, Some(created.id));
}
