// Business case operations: create, fetch, list, archive
//
// Creating a case takes two writes, the case and then the intake link. If
// the link save fails the case is left behind unlinked; a later create for
// the same intake is a Conflict until that case is archived.

use tracing::{info, warn, Instrument};
use uuid::Uuid;

use super::{IntakeWorkflow, RequestContext};
use crate::auth::authorize_requester;
use crate::errors::{ModelRef, QueryOperation, WorkflowError};
use crate::models::{BusinessCase, BusinessCaseStatus};
use crate::validation::validate_business_case;

impl IntakeWorkflow {
    /// Create a business case for an intake owned by the principal and
    /// link it from the intake.
    pub async fn create_business_case(
        &self,
        ctx: &RequestContext,
        mut business_case: BusinessCase,
    ) -> Result<BusinessCase, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let intake_id = business_case.system_intake_id;
            let mut intake = self.store.fetch_intake(intake_id).await.map_err(|source| {
                WorkflowError::query(QueryOperation::Fetch, ModelRef::IntakeId(intake_id), source)
            })?;
            authorize_requester(
                ctx.span(),
                ctx.principal(),
                Some(intake.eua_user_id.as_str()),
                "create business case",
            )?;

            if let Some(linked) = intake.business_case_id {
                return Err(WorkflowError::conflict(
                    intake.id,
                    format!("intake already has business case {linked}"),
                ));
            }
            let owned = self
                .store
                .fetch_business_cases_by_owner(&intake.eua_user_id)
                .await
                .map_err(|source| {
                    WorkflowError::query(
                        QueryOperation::Fetch,
                        ModelRef::BusinessCasesForOwner(intake.eua_user_id.clone()),
                        source,
                    )
                })?;
            if let Some(unlinked) = owned
                .iter()
                .find(|existing| existing.system_intake_id == intake.id && !existing.is_archived())
            {
                warn!(
                    intake_id = %intake.id,
                    business_case_id = %unlinked.id,
                    "unlinked business case found"
                );
                return Err(WorkflowError::conflict(
                    intake.id,
                    format!("business case {} already exists for this intake", unlinked.id),
                ));
            }

            let now = self.clock.now();
            if business_case.id.is_nil() {
                business_case.id = Uuid::new_v4();
            }
            business_case.eua_user_id = intake.eua_user_id.clone();
            business_case.status = BusinessCaseStatus::Draft;
            business_case.created_at = Some(now);
            business_case.updated_at = Some(now);
            business_case.submitted_at = None;
            business_case.archived_at = None;
            business_case.version = 0;

            validate_business_case(&business_case)?;

            let created = self
                .store
                .create_business_case(&business_case)
                .await
                .map_err(|source| {
                    WorkflowError::query(
                        QueryOperation::Create,
                        ModelRef::business_case(&business_case),
                        source,
                    )
                })?;

            intake.business_case_id = Some(created.id);
            intake.updated_at = Some(now);
            self.store
                .save_intake(&intake)
                .await
                .map_err(|source| WorkflowError::from_save(ModelRef::intake(&intake), source))?;

            info!(business_case_id = %created.id, intake_id = %intake.id, "business case created");
            Ok(created)
        }
        .instrument(span)
        .await
    }

    pub async fn fetch_business_case(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<BusinessCase, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let business_case = self.store.fetch_business_case(id).await.map_err(|source| {
                WorkflowError::query(QueryOperation::Fetch, ModelRef::BusinessCaseId(id), source)
            })?;
            info!(business_case_id = %id, user = %ctx.principal().id(), "business case fetched");
            Ok(business_case)
        }
        .instrument(span)
        .await
    }

    /// Business cases owned by `eua_user_id`, oldest first
    pub async fn fetch_business_cases_by_owner(
        &self,
        ctx: &RequestContext,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let business_cases = self
                .store
                .fetch_business_cases_by_owner(eua_user_id)
                .await
                .map_err(|source| {
                    WorkflowError::query(
                        QueryOperation::Fetch,
                        ModelRef::BusinessCasesForOwner(eua_user_id.to_string()),
                        source,
                    )
                })?;
            info!(owner = %eua_user_id, count = business_cases.len(), "business cases listed");
            Ok(business_cases)
        }
        .instrument(span)
        .await
    }

    /// Archive a business case. Archiving an archived case returns it as
    /// stored, so `archived_at` is only ever set once.
    pub async fn archive_business_case(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<BusinessCase, WorkflowError> {
        let span = ctx.span().clone();
        async move {
            let mut business_case = self.store.fetch_business_case(id).await.map_err(|source| {
                WorkflowError::query(QueryOperation::Fetch, ModelRef::BusinessCaseId(id), source)
            })?;

            authorize_requester(
                ctx.span(),
                ctx.principal(),
                Some(business_case.eua_user_id.as_str()),
                "archive business case",
            )?;

            if business_case.is_archived() {
                return Ok(business_case);
            }

            let now = self.clock.now();
            business_case.status = BusinessCaseStatus::Archived;
            business_case.archived_at = Some(now);
            business_case.updated_at = Some(now);

            let saved = self
                .store
                .save_business_case(&business_case)
                .await
                .map_err(|source| {
                    WorkflowError::from_save(ModelRef::business_case(&business_case), source)
                })?;

            info!(business_case_id = %saved.id, "business case archived");
            Ok(saved)
        }
        .instrument(span)
        .await
    }
}
