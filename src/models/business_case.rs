// Business case record linked to an intake

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::BusinessCaseStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposedSolution {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

/// Justification for an intake, at most one per intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessCase {
    pub id: Uuid,
    pub system_intake_id: Uuid,
    pub eua_user_id: String,
    pub status: BusinessCaseStatus,

    pub project_name: Option<String>,
    pub requester: Option<String>,
    pub requester_phone_number: Option<String>,
    pub business_owner: Option<String>,
    pub business_need: Option<String>,
    pub cms_benefit: Option<String>,
    pub priority_alignment: Option<String>,
    pub success_indicators: Option<String>,

    pub as_is_solution: Option<ProposedSolution>,
    pub preferred_solution: Option<ProposedSolution>,
    pub alternative_a: Option<ProposedSolution>,
    pub alternative_b: Option<ProposedSolution>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,

    pub version: u64,
}

impl Default for BusinessCase {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            system_intake_id: Uuid::nil(),
            eua_user_id: String::new(),
            status: BusinessCaseStatus::Draft,
            project_name: None,
            requester: None,
            requester_phone_number: None,
            business_owner: None,
            business_need: None,
            cms_benefit: None,
            priority_alignment: None,
            success_indicators: None,
            as_is_solution: None,
            preferred_solution: None,
            alternative_a: None,
            alternative_b: None,
            created_at: None,
            updated_at: None,
            submitted_at: None,
            archived_at: None,
            version: 0,
        }
    }
}

impl BusinessCase {
    pub fn is_archived(&self) -> bool {
        self.status == BusinessCaseStatus::Archived
    }
}
