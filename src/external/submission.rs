// HTTP client for the intake submission API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{ClientError, SubmissionApi, SubmissionReceipt};
use crate::http::RateLimitedHttpClient;
use crate::models::SystemIntake;

const GOVERNANCE_PATH: [&str; 2] = ["intake", "governance"];

/// One intake in the gateway's governance payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceIntake {
    pub id: String,
    pub eua_user_id: String,
    pub status: String,
    pub requester: String,
    pub requester_component: String,
    pub business_owner: String,
    pub business_owner_component: String,
    pub product_manager: String,
    pub product_manager_component: String,
    pub isso: String,
    pub trb_collaborator: String,
    pub oit_security_collaborator: String,
    pub ea_collaborator: String,
    pub system_name: String,
    pub existing_funding: bool,
    pub funding_source: String,
    pub business_needs: String,
    pub solution: String,
    pub process_status: String,
    pub ea_support_request: bool,
    pub existing_contract: String,
    pub submitted_time: String,
}

impl From<&SystemIntake> for GovernanceIntake {
    fn from(intake: &SystemIntake) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            id: intake.id.to_string(),
            eua_user_id: intake.eua_user_id.clone(),
            status: intake.status.to_string(),
            requester: intake.requester.clone(),
            requester_component: text(&intake.component),
            business_owner: text(&intake.business_owner),
            business_owner_component: text(&intake.business_owner_component),
            product_manager: text(&intake.product_manager),
            product_manager_component: text(&intake.product_manager_component),
            isso: text(&intake.isso),
            trb_collaborator: text(&intake.trb_collaborator),
            oit_security_collaborator: text(&intake.oit_security_collaborator),
            ea_collaborator: text(&intake.ea_collaborator),
            system_name: text(&intake.project_name),
            existing_funding: intake.existing_funding.unwrap_or_default(),
            funding_source: text(&intake.funding_source),
            business_needs: text(&intake.business_need),
            solution: text(&intake.solution),
            process_status: text(&intake.process_status),
            ea_support_request: intake.ea_support_request.unwrap_or_default(),
            existing_contract: text(&intake.existing_contract),
            submitted_time: intake
                .submitted_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GovernanceRequest {
    governance: Vec<GovernanceIntake>,
}

#[derive(Debug, Deserialize)]
struct GovernanceResponse {
    response: GovernanceResult,
}

#[derive(Debug, Deserialize)]
struct GovernanceResult {
    result: String,
    #[serde(default)]
    message: Vec<String>,
}

pub struct HttpSubmissionClient {
    http: RateLimitedHttpClient,
}

impl HttpSubmissionClient {
    pub fn new(http: RateLimitedHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SubmissionApi for HttpSubmissionClient {
    async fn submit_intake(&self, intake: &SystemIntake) -> Result<SubmissionReceipt, ClientError> {
        let request = GovernanceRequest {
            governance: vec![GovernanceIntake::from(intake)],
        };

        let response: GovernanceResponse = self
            .http
            .post_json(&GOVERNANCE_PATH, &request)
            .await
            .inspect_err(|e| {
                error!(intake_id = %intake.id, error = %e, "Failed to submit intake");
            })?;

        info!(
            intake_id = %intake.id,
            result = %response.response.result,
            "Submission API answered"
        );
        Ok(SubmissionReceipt {
            result: response.response.result,
            messages: response.response.message,
        })
    }
}
