// Domain records moved through the intake approval workflow

pub mod business_case;
pub mod intake;
pub mod status;

pub use business_case::{BusinessCase, ProposedSolution};
pub use intake::SystemIntake;
pub use status::{BusinessCaseStatus, IntakeStatus, ParseStatusError};
