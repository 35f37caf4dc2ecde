// SUBMITTED -> ACCEPTED | APPROVED | CLOSED: a governance reviewer decides
//
// The decision is applied onto the stored record, never the incoming one.
// Reviewers only set the status and decision message; everything the
// requester wrote stays as stored.

use tracing::{info, warn};

use super::transitions::Transition;
use super::{IntakeWorkflow, RequestContext};
use crate::auth::authorize_reviewer;
use crate::errors::{ExternalOperation, ExternalSource, ModelRef, WorkflowError};
use crate::external::ClientError;
use crate::models::SystemIntake;
use crate::notify::Notification;

impl IntakeWorkflow {
    pub(super) async fn decide(
        &self,
        ctx: &RequestContext,
        transition: Transition,
        mut existing: SystemIntake,
        incoming: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        authorize_reviewer(ctx.span(), ctx.principal(), "decide intake")?;

        let now = self.clock.now();

        let recipient = self
            .directory
            .lookup_email(&existing.eua_user_id)
            .await
            .map_err(|source| directory_error(&existing, source))?;
        if recipient.trim().is_empty() {
            return Err(directory_error(
                &existing,
                ClientError::Rejected {
                    message: format!("no email address found for {}", existing.eua_user_id),
                },
            ));
        }

        existing.status = transition.target_status();
        existing.decision_message = incoming.decision_message;
        existing.requester_email_address = Some(recipient.clone());
        existing.decided_at = Some(now);
        existing.updated_at = Some(now);

        let saved = self
            .store
            .save_intake(&existing)
            .await
            .map_err(|source| WorkflowError::from_save(ModelRef::intake(&existing), source))?;

        info!(
            intake_id = %saved.id,
            status = %saved.status,
            reviewer = %ctx.principal().id(),
            "intake decided"
        );

        let notification = Notification::IntakeReviewed {
            intake_id: saved.id,
            recipient,
            body: saved.decision_message.clone().unwrap_or_default(),
        };
        if let Err(source) = self.notifier.notify(&notification).await {
            warn!(intake_id = %saved.id, error = %source, "decision notification failed");
            return Err(WorkflowError::Notification {
                intake_id: saved.id,
                source,
            });
        }

        Ok(saved)
    }
}

fn directory_error(intake: &SystemIntake, source: ClientError) -> WorkflowError {
    warn!(
        intake_id = %intake.id,
        user = %intake.eua_user_id,
        error = %source,
        "requester email lookup failed"
    );
    WorkflowError::external(
        ExternalSource::Directory,
        ExternalOperation::FetchEmail,
        intake.id,
        source,
    )
}
