// DRAFT -> SUBMITTED: validate, hand the intake to the submission API,
// record the reference it assigns and tell the review team

use tracing::{error, info, warn};

use super::{IntakeWorkflow, RequestContext};
use crate::auth::authorize_requester;
use crate::errors::{ExternalOperation, ExternalSource, ModelRef, WorkflowError};
use crate::external::ClientError;
use crate::models::SystemIntake;
use crate::notify::Notification;

impl IntakeWorkflow {
    pub(super) async fn submit(
        &self,
        ctx: &RequestContext,
        existing: SystemIntake,
        mut incoming: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        authorize_requester(
            ctx.span(),
            ctx.principal(),
            Some(existing.eua_user_id.as_str()),
            "submit intake",
        )?;

        if existing.is_submitted_externally() || incoming.is_submitted_externally() {
            warn!(
                intake_id = %existing.id,
                reference = existing.external_reference.as_deref().unwrap_or_default(),
                "intake already submitted"
            );
            return Err(WorkflowError::conflict(
                existing.id,
                "intake has already been submitted",
            ));
        }

        incoming.pin_system_fields(&existing);
        let now = self.clock.now();
        incoming.updated_at = Some(now);
        incoming.submitted_at = Some(now);

        self.validator.validate(&incoming)?;

        let receipt = self
            .submission
            .submit_intake(&incoming)
            .await
            .map_err(|source| submit_error(&incoming, source))?;

        if !receipt.is_success() {
            return Err(submit_error(
                &incoming,
                ClientError::Rejected {
                    message: format!(
                        "submission returned result {:?}: {}",
                        receipt.result,
                        receipt.messages.join("; ")
                    ),
                },
            ));
        }
        let reference = receipt.reference().ok_or_else(|| {
            submit_error(
                &incoming,
                ClientError::Rejected {
                    message: "submission succeeded without an external reference".to_string(),
                },
            )
        })?;
        incoming.external_reference = Some(reference.to_string());

        let saved = self
            .store
            .save_intake(&incoming)
            .await
            .map_err(|source| {
                // The external system already holds this intake
                error!(
                    intake_id = %incoming.id,
                    reference = %reference,
                    error = %source,
                    "submitted intake could not be saved"
                );
                WorkflowError::from_save(ModelRef::intake(&incoming), source)
            })?;

        info!(
            intake_id = %saved.id,
            reference = saved.external_reference.as_deref().unwrap_or_default(),
            "intake submitted"
        );

        let notification = Notification::IntakeSubmitted {
            intake_id: saved.id,
            requester: saved.requester.clone(),
            owner: saved.eua_user_id.clone(),
        };
        if let Err(source) = self.notifier.notify(&notification).await {
            warn!(intake_id = %saved.id, error = %source, "submission notification failed");
            return Err(WorkflowError::Notification {
                intake_id: saved.id,
                source,
            });
        }

        Ok(saved)
    }
}

fn submit_error(intake: &SystemIntake, source: ClientError) -> WorkflowError {
    warn!(intake_id = %intake.id, error = %source, "submission API call failed");
    WorkflowError::external(
        ExternalSource::SubmissionApi,
        ExternalOperation::Submit,
        intake.id,
        source,
    )
}
