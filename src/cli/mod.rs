use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

pub mod commands;

#[derive(Parser)]
#[command(name = "intake-workflow")]
#[command(about = "System intake approval workflow")]
#[command(long_about = "Create, submit, review and archive system intake requests. \
                       Records are read and written as JSON; the acting user is given with \
                       --user and --job-code.")]
pub struct Cli {
    #[command(flatten)]
    pub principal: PrincipalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct PrincipalArgs {
    /// Acting user id
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Job codes held by the acting user; repeat for several
    #[arg(long = "job-code", global = true, value_delimiter = ',')]
    pub job_codes: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with system intakes
    #[command(subcommand)]
    Intake(IntakeCommands),
    /// Work with business cases
    #[command(subcommand)]
    BusinessCase(BusinessCaseCommands),
}

#[derive(Subcommand)]
pub enum IntakeCommands {
    /// Create a draft intake from a JSON file
    Create {
        #[arg(help = "Path to the intake JSON")]
        file: PathBuf,
    },
    /// Print one intake
    Show { id: Uuid },
    /// List intakes owned by a user (defaults to the acting user)
    List {
        #[arg(long, help = "Owner whose intakes to list")]
        owner: Option<String>,
    },
    /// Apply the desired state in a JSON file; the status it carries picks
    /// the transition (edit draft, submit, or decide)
    Update {
        #[arg(help = "Path to the intake JSON")]
        file: PathBuf,
    },
    /// Archive an intake and its business case
    Archive { id: Uuid },
}

#[derive(Subcommand)]
pub enum BusinessCaseCommands {
    /// Create a business case from a JSON file
    Create {
        #[arg(help = "Path to the business case JSON")]
        file: PathBuf,
    },
    /// Print one business case
    Show { id: Uuid },
    /// List business cases owned by a user (defaults to the acting user)
    List {
        #[arg(long, help = "Owner whose business cases to list")]
        owner: Option<String>,
    },
    /// Archive a business case
    Archive { id: Uuid },
}
