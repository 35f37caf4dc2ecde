// Archive: terminal status for an intake, entered by id only
//
// A linked business case is archived first. The two writes are separate; if
// the intake save fails after the business case was archived, the business
// case stays archived and the error is returned.

use tracing::{info, warn, Instrument};
use uuid::Uuid;

use super::{IntakeWorkflow, RequestContext};
use crate::auth::authorize_requester;
use crate::errors::{ModelRef, QueryOperation, WorkflowError};
use crate::models::{IntakeStatus, SystemIntake};

impl IntakeWorkflow {
    pub async fn archive_intake(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<SystemIntake, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let existing = self
                .store
                .fetch_intake(id)
                .await
                .map_err(|source| WorkflowError::query(QueryOperation::Fetch, ModelRef::IntakeId(id), source))?;
            self.archive(ctx, existing).await
        }
        .instrument(span)
        .await
    }

    pub(super) async fn archive(
        &self,
        ctx: &RequestContext,
        mut existing: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        authorize_requester(
            ctx.span(),
            ctx.principal(),
            Some(existing.eua_user_id.as_str()),
            "archive intake",
        )?;

        if existing.status == IntakeStatus::Archived {
            return Err(WorkflowError::conflict(existing.id, "intake is already archived"));
        }

        if let Some(business_case_id) = existing.business_case_id {
            if let Err(err) = self.archive_business_case(ctx, business_case_id).await {
                warn!(
                    intake_id = %existing.id,
                    business_case_id = %business_case_id,
                    error = %err,
                    "business case archive failed; intake left unchanged"
                );
                return Err(err);
            }
        }

        let now = self.clock.now();
        existing.status = IntakeStatus::Archived;
        existing.updated_at = Some(now);
        existing.archived_at = Some(now);

        let saved = self
            .store
            .save_intake(&existing)
            .await
            .map_err(|source| WorkflowError::from_save(ModelRef::intake(&existing), source))?;

        info!(intake_id = %saved.id, "intake archived");
        Ok(saved)
    }
}
