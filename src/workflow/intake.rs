// Create and read operations for intakes

use tracing::{info, Instrument};
use uuid::Uuid;

use super::{IntakeWorkflow, RequestContext};
use crate::errors::{ModelRef, QueryOperation, WorkflowError};
use crate::models::{IntakeStatus, SystemIntake};

impl IntakeWorkflow {
    /// Store a new draft owned by the acting principal.
    ///
    /// Status, ownership and every system-managed field are set here
    /// regardless of what the request carried.
    pub async fn create_intake(
        &self,
        ctx: &RequestContext,
        mut intake: SystemIntake,
    ) -> Result<SystemIntake, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let principal = ctx.principal();
            if !principal.allows_access() {
                info!(
                    authorized = false,
                    operation = "create intake",
                    user = %principal.id(),
                    "principal may not create intakes"
                );
                return Err(WorkflowError::Unauthorized {
                    operation: "create intake",
                });
            }

            let now = self.clock.now();
            if intake.id.is_nil() {
                intake.id = Uuid::new_v4();
            }
            intake.eua_user_id = principal.id().to_string();
            intake.status = IntakeStatus::Draft;
            intake.created_at = Some(now);
            intake.updated_at = Some(now);
            intake.submitted_at = None;
            intake.decided_at = None;
            intake.archived_at = None;
            intake.external_reference = None;
            intake.business_case_id = None;
            intake.decision_message = None;
            intake.requester_email_address = None;
            intake.version = 0;

            let created = self
                .store
                .create_intake(&intake)
                .await
                .map_err(|source| {
                    WorkflowError::query(QueryOperation::Create, ModelRef::intake(&intake), source)
                })?;

            info!(intake_id = %created.id, owner = %created.eua_user_id, "intake created");
            Ok(created)
        }
        .instrument(span)
        .await
    }

    pub async fn fetch_intake(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<SystemIntake, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let intake = self
                .store
                .fetch_intake(id)
                .await
                .map_err(|source| WorkflowError::query(QueryOperation::Fetch, ModelRef::IntakeId(id), source))?;
            info!(intake_id = %intake.id, user = %ctx.principal().id(), "intake fetched");
            Ok(intake)
        }
        .instrument(span)
        .await
    }

    /// Intakes owned by `eua_user_id`, oldest first
    pub async fn fetch_intakes_by_owner(
        &self,
        ctx: &RequestContext,
        eua_user_id: &str,
    ) -> Result<Vec<SystemIntake>, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let intakes = self
                .store
                .fetch_intakes_by_owner(eua_user_id)
                .await
                .map_err(|source| {
                    WorkflowError::query(
                        QueryOperation::Fetch,
                        ModelRef::IntakesForOwner(eua_user_id.to_string()),
                        source,
                    )
                })?;
            info!(owner = %eua_user_id, count = intakes.len(), "intakes listed");
            Ok(intakes)
        }
        .instrument(span)
        .await
    }
}
