// Routes an update request to the handler its status change selects

use tracing::{info, warn, Instrument};

use super::transitions::{classify, Transition};
use super::{IntakeWorkflow, RequestContext};
use crate::errors::{ModelRef, QueryOperation, WorkflowError};
use crate::models::SystemIntake;

impl IntakeWorkflow {
    /// Apply the desired state in `incoming` to the stored intake with the
    /// same id.
    ///
    /// The only state read here is the single fetch of the stored record;
    /// every mutation happens inside the selected handler.
    pub async fn update_intake(
        &self,
        ctx: &RequestContext,
        incoming: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let existing = self.store.fetch_intake(incoming.id).await.map_err(|source| {
                warn!(intake_id = %incoming.id, error = %source, "failed to fetch system intake");
                WorkflowError::query(QueryOperation::Fetch, ModelRef::IntakeId(incoming.id), source)
            })?;

            let Some(transition) = classify(existing.status, incoming.status) else {
                warn!(
                    intake_id = %existing.id,
                    from = %existing.status,
                    to = %incoming.status,
                    "rejected status change"
                );
                return Err(WorkflowError::conflict(
                    existing.id,
                    format!(
                        "invalid intake status change from {} to {}",
                        existing.status, incoming.status
                    ),
                ));
            };

            info!(intake_id = %existing.id, transition = %transition, "dispatching transition");

            match transition {
                Transition::UpdateDraft => self.update_draft(ctx, existing, incoming).await,
                Transition::Submit => self.submit(ctx, existing, incoming).await,
                Transition::DecideAccepted
                | Transition::DecideApproved
                | Transition::DecideClosed => self.decide(ctx, transition, existing, incoming).await,
                Transition::Archive => self.archive(ctx, existing).await,
            }
        }
        .instrument(span)
        .await
    }
}
