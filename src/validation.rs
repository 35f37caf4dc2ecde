// Completeness rules checked before an intake leaves the draft state
//
// Rules never stop at the first failure; every missing or malformed field is
// collected so the requester can fix them all at once.

use regex::Regex;
use std::sync::LazyLock;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::errors::ValidationError;
use crate::models::{BusinessCase, SystemIntake};

const REQUIRED: &str = "is required";

static FUNDING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("funding number pattern is valid"));

/// Completeness check collaborator run by the Submit transition
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait IntakeValidator: Send + Sync {
    fn validate(&self, intake: &SystemIntake) -> Result<(), ValidationError>;
}

/// The production rule set for submission
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredFieldsValidator;

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl IntakeValidator for RequiredFieldsValidator {
    fn validate(&self, intake: &SystemIntake) -> Result<(), ValidationError> {
        let mut err = ValidationError::new(intake.id.to_string());

        if intake.id.is_nil() {
            err.with_validation("ID", REQUIRED);
        }
        if intake.eua_user_id.trim().is_empty() {
            err.with_validation("EUAUserID", REQUIRED);
        }
        if intake.requester.trim().is_empty() {
            err.with_validation("Requester", REQUIRED);
        }

        let optional_text = [
            ("Component", &intake.component),
            ("BusinessOwner", &intake.business_owner),
            ("BusinessOwnerComponent", &intake.business_owner_component),
            ("ProductManager", &intake.product_manager),
            ("ProductManagerComponent", &intake.product_manager_component),
            ("ProjectName", &intake.project_name),
        ];
        for (field, value) in optional_text {
            if blank(value) {
                err.with_validation(field, REQUIRED);
            }
        }

        match intake.existing_funding {
            None => err.with_validation("ExistingFunding", REQUIRED),
            Some(true) => match intake.funding_source.as_deref().map(str::trim) {
                None | Some("") => err.with_validation("FundingSource", REQUIRED),
                Some(source) if !FUNDING_NUMBER.is_match(source) => {
                    err.with_validation("FundingSource", "must be a 6 digit string")
                }
                Some(_) => {}
            },
            Some(false) => {}
        }

        if blank(&intake.business_need) {
            err.with_validation("BusinessNeed", REQUIRED);
        }
        if blank(&intake.solution) {
            err.with_validation("Solution", REQUIRED);
        }
        if intake.ea_support_request.is_none() {
            err.with_validation("EASupportRequest", REQUIRED);
        }
        if blank(&intake.process_status) {
            err.with_validation("ProcessStatus", REQUIRED);
        }
        if blank(&intake.existing_contract) {
            err.with_validation("ExistingContract", REQUIRED);
        }
        if intake.submitted_at.is_none() {
            err.with_validation("SubmittedAt", REQUIRED);
        }

        err.into_result()
    }
}

/// Content rules for a new business case
pub fn validate_business_case(business_case: &BusinessCase) -> Result<(), ValidationError> {
    let mut err = ValidationError::new(business_case.id.to_string());

    if business_case.system_intake_id.is_nil() {
        err.with_validation("SystemIntakeID", REQUIRED);
    }
    for (field, value) in [
        ("ProjectName", &business_case.project_name),
        ("Requester", &business_case.requester),
        ("BusinessOwner", &business_case.business_owner),
        ("BusinessNeed", &business_case.business_need),
    ] {
        if blank(value) {
            err.with_validation(field, REQUIRED);
        }
    }
    if let Some(phone) = business_case.requester_phone_number.as_deref() {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            err.with_validation("RequesterPhoneNumber", "must contain at least 10 digits");
        }
    }

    err.into_result()
}
