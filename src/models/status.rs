// Status enumerations for intakes and business cases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a system intake.
///
/// Motion between these values is governed by
/// [`classify`](crate::workflow::classify) and the archive operation; nothing
/// else may change an intake's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(rename_all = "UPPERCASE")]
pub enum IntakeStatus {
    Draft,
    Submitted,
    Accepted,
    Approved,
    Closed,
    Archived,
}

impl IntakeStatus {
    pub const ALL: [IntakeStatus; 6] = [
        IntakeStatus::Draft,
        IntakeStatus::Submitted,
        IntakeStatus::Accepted,
        IntakeStatus::Approved,
        IntakeStatus::Closed,
        IntakeStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::Draft => "DRAFT",
            IntakeStatus::Submitted => "SUBMITTED",
            IntakeStatus::Accepted => "ACCEPTED",
            IntakeStatus::Approved => "APPROVED",
            IntakeStatus::Closed => "CLOSED",
            IntakeStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for IntakeStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntakeStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Lifecycle status of a business case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusinessCaseStatus {
    Draft,
    Submitted,
    Archived,
}

impl BusinessCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCaseStatus::Draft => "DRAFT",
            BusinessCaseStatus::Submitted => "SUBMITTED",
            BusinessCaseStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for BusinessCaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
