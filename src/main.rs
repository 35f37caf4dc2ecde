use anyhow::{Context, Result};
use clap::Parser;

use intake_workflow::cli::commands::{App, BusinessCaseCommand, Command, IntakeCommand};
use intake_workflow::cli::{Cli, Commands};
use intake_workflow::config::IntakeWorkflowConfig;
use intake_workflow::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = IntakeWorkflowConfig::load_env_file() {
        eprintln!("Warning: failed to load .env file: {e}");
    }
    let config = IntakeWorkflowConfig::load()?;

    if let Err(e) = init_telemetry(&config.observability.log_level) {
        eprintln!("Warning: failed to initialize telemetry: {e}");
    }

    let app = App::from_config(&config, &cli.principal).await?;

    let result = match cli.command {
        Commands::Intake(command) => IntakeCommand::new(command).execute(&app).await,
        Commands::BusinessCase(command) => BusinessCaseCommand::new(command).execute(&app).await,
    };
    result.with_context(|| format!("request {} failed", app.ctx.correlation_id()))
}
