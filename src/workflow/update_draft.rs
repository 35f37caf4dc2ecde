// DRAFT -> DRAFT: the requester edits their own draft

use tracing::info;

use super::{IntakeWorkflow, RequestContext};
use crate::auth::authorize_requester;
use crate::errors::{ModelRef, WorkflowError};
use crate::models::SystemIntake;

impl IntakeWorkflow {
    /// Persist the incoming draft wholesale. Only system-managed fields are
    /// taken from the stored record.
    pub(super) async fn update_draft(
        &self,
        ctx: &RequestContext,
        existing: SystemIntake,
        mut incoming: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        authorize_requester(
            ctx.span(),
            ctx.principal(),
            Some(existing.eua_user_id.as_str()),
            "update draft intake",
        )?;

        incoming.pin_system_fields(&existing);
        incoming.updated_at = Some(self.clock.now());

        let saved = self
            .store
            .save_intake(&incoming)
            .await
            .map_err(|source| WorkflowError::from_save(ModelRef::intake(&incoming), source))?;

        info!(intake_id = %saved.id, version = saved.version, "draft intake updated");
        Ok(saved)
    }
}
