// The transition table: the only place legal status motion is defined

use std::fmt;

use crate::models::IntakeStatus;

/// Named, authorized mutation of an intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    UpdateDraft,
    Submit,
    DecideAccepted,
    DecideApproved,
    DecideClosed,
    /// Entered by intake id only; never produced by [`classify`]
    Archive,
}

/// (current status, requested status) pairs accepted by the update operation
pub const TRANSITION_TABLE: [(IntakeStatus, IntakeStatus, Transition); 5] = [
    (IntakeStatus::Draft, IntakeStatus::Draft, Transition::UpdateDraft),
    (IntakeStatus::Draft, IntakeStatus::Submitted, Transition::Submit),
    (IntakeStatus::Submitted, IntakeStatus::Accepted, Transition::DecideAccepted),
    (IntakeStatus::Submitted, IntakeStatus::Approved, Transition::DecideApproved),
    (IntakeStatus::Submitted, IntakeStatus::Closed, Transition::DecideClosed),
];

/// Map a requested status change to its transition; `None` for every pair
/// not listed in [`TRANSITION_TABLE`]
pub fn classify(current: IntakeStatus, requested: IntakeStatus) -> Option<Transition> {
    TRANSITION_TABLE
        .iter()
        .find(|(from, to, _)| *from == current && *to == requested)
        .map(|(_, _, transition)| *transition)
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::UpdateDraft => "update-draft",
            Transition::Submit => "submit",
            Transition::DecideAccepted => "decide-accepted",
            Transition::DecideApproved => "decide-approved",
            Transition::DecideClosed => "decide-closed",
            Transition::Archive => "archive",
        }
    }

    /// Status an intake holds after this transition succeeds
    pub fn target_status(&self) -> IntakeStatus {
        match self {
            Transition::UpdateDraft => IntakeStatus::Draft,
            Transition::Submit => IntakeStatus::Submitted,
            Transition::DecideAccepted => IntakeStatus::Accepted,
            Transition::DecideApproved => IntakeStatus::Approved,
            Transition::DecideClosed => IntakeStatus::Closed,
            Transition::Archive => IntakeStatus::Archived,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
