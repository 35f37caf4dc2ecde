// System intake record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::IntakeStatus;

/// An approval request tracked through the intake workflow.
///
/// `version` is the storage concurrency token: stores only accept a write
/// whose version matches what they hold and bump it on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemIntake {
    pub id: Uuid,
    /// Identity of the submitting user; the record owner
    pub eua_user_id: String,
    pub status: IntakeStatus,

    pub requester: String,
    pub component: Option<String>,
    pub business_owner: Option<String>,
    pub business_owner_component: Option<String>,
    pub product_manager: Option<String>,
    pub product_manager_component: Option<String>,
    pub isso: Option<String>,
    pub trb_collaborator: Option<String>,
    pub oit_security_collaborator: Option<String>,
    pub ea_collaborator: Option<String>,
    pub project_name: Option<String>,
    pub existing_funding: Option<bool>,
    pub funding_source: Option<String>,
    pub business_need: Option<String>,
    pub solution: Option<String>,
    pub process_status: Option<String>,
    pub ea_support_request: Option<bool>,
    pub existing_contract: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,

    /// Reference assigned by the external submission system; write-once
    pub external_reference: Option<String>,
    pub business_case_id: Option<Uuid>,
    /// Reviewer-authored decision text sent to the requester
    pub decision_message: Option<String>,
    pub requester_email_address: Option<String>,

    pub version: u64,
}

impl Default for SystemIntake {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            eua_user_id: String::new(),
            status: IntakeStatus::Draft,
            requester: String::new(),
            component: None,
            business_owner: None,
            business_owner_component: None,
            product_manager: None,
            product_manager_component: None,
            isso: None,
            trb_collaborator: None,
            oit_security_collaborator: None,
            ea_collaborator: None,
            project_name: None,
            existing_funding: None,
            funding_source: None,
            business_need: None,
            solution: None,
            process_status: None,
            ea_support_request: None,
            existing_contract: None,
            created_at: None,
            updated_at: None,
            submitted_at: None,
            decided_at: None,
            archived_at: None,
            external_reference: None,
            business_case_id: None,
            decision_message: None,
            requester_email_address: None,
            version: 0,
        }
    }
}

impl SystemIntake {
    /// Create an empty draft owned by `eua_user_id`
    pub fn new_draft(eua_user_id: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            eua_user_id: eua_user_id.into(),
            requester: requester.into(),
            ..Default::default()
        }
    }

    pub fn is_submitted_externally(&self) -> bool {
        self.external_reference
            .as_deref()
            .is_some_and(|reference| !reference.is_empty())
    }

    /// Copy every field the workflow owns from `existing` onto `self`.
    ///
    /// Requester-editable content is left alone. Identity, ownership,
    /// lifecycle timestamps, the external reference, the business case link,
    /// the decision email fields and the storage version always come from
    /// the stored record; only a decision may write the decision fields.
    pub fn pin_system_fields(&mut self, existing: &SystemIntake) {
        self.id = existing.id;
        self.eua_user_id = existing.eua_user_id.clone();
        self.created_at = existing.created_at;
        self.submitted_at = existing.submitted_at;
        self.decided_at = existing.decided_at;
        self.archived_at = existing.archived_at;
        self.external_reference = existing.external_reference.clone();
        self.business_case_id = existing.business_case_id;
        self.decision_message = existing.decision_message.clone();
        self.requester_email_address = existing.requester_email_address.clone();
        self.version = existing.version;
    }

    /// True when every requester-owned business field matches `other`
    pub fn same_business_fields(&self, other: &SystemIntake) -> bool {
        self.eua_user_id == other.eua_user_id
            && self.requester == other.requester
            && self.component == other.component
            && self.business_owner == other.business_owner
            && self.business_owner_component == other.business_owner_component
            && self.product_manager == other.product_manager
            && self.product_manager_component == other.product_manager_component
            && self.isso == other.isso
            && self.trb_collaborator == other.trb_collaborator
            && self.oit_security_collaborator == other.oit_security_collaborator
            && self.ea_collaborator == other.ea_collaborator
            && self.project_name == other.project_name
            && self.existing_funding == other.existing_funding
            && self.funding_source == other.funding_source
            && self.business_need == other.business_need
            && self.solution == other.solution
            && self.process_status == other.process_status
            && self.ea_support_request == other.ea_support_request
            && self.existing_contract == other.existing_contract
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_system_fields_keeps_requester_content() {
        let now = Utc::now();
        let existing = SystemIntake {
            created_at: Some(now),
            external_reference: Some("ALF-7".to_string()),
            business_case_id: Some(Uuid::new_v4()),
            version: 4,
            ..SystemIntake::new_draft("ABCD", "Jane Requester")
        };

        let mut incoming = SystemIntake {
            eua_user_id: "ZZZZ".to_string(),
            project_name: Some("New name".to_string()),
            decision_message: Some("Approved".to_string()),
            requester_email_address: Some("someone@example.com".to_string()),
            ..SystemIntake::default()
        };
        incoming.pin_system_fields(&existing);

        assert_eq!(incoming.id, existing.id);
        assert_eq!(incoming.eua_user_id, "ABCD");
        assert_eq!(incoming.created_at, Some(now));
        assert_eq!(incoming.external_reference.as_deref(), Some("ALF-7"));
        assert_eq!(incoming.business_case_id, existing.business_case_id);
        assert_eq!(incoming.version, 4);
        assert_eq!(incoming.decision_message, None);
        assert_eq!(incoming.requester_email_address, None);
        assert_eq!(incoming.project_name.as_deref(), Some("New name"));
    }

    #[test]
    fn test_empty_reference_is_not_submitted() {
        let mut intake = SystemIntake::new_draft("ABCD", "Jane");
        assert!(!intake.is_submitted_externally());
        intake.external_reference = Some(String::new());
        assert!(!intake.is_submitted_externally());
        intake.external_reference = Some("ALF-1".to_string());
        assert!(intake.is_submitted_externally());
    }

    #[test]
    fn test_missing_version_defaults_to_zero() {
        let mut value = serde_json::to_value(SystemIntake::new_draft("ABCD", "Jane")).unwrap();
        value.as_object_mut().unwrap().remove("version");
        let intake: SystemIntake = serde_json::from_value(value).unwrap();
        assert_eq!(intake.version, 0);
    }
}
