use anyhow::Result;

use super::{print_json, read_json, App, Command};
use crate::cli::IntakeCommands;
use crate::models::SystemIntake;

pub struct IntakeCommand {
    pub command: IntakeCommands,
}

impl IntakeCommand {
    pub fn new(command: IntakeCommands) -> Self {
        Self { command }
    }
}

impl Command for IntakeCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let ctx = &app.ctx;
        match &self.command {
            IntakeCommands::Create { file } => {
                let intake: SystemIntake = read_json(file).await?;
                print_json(&app.workflow.create_intake(ctx, intake).await?)
            }
            IntakeCommands::Show { id } => print_json(&app.workflow.fetch_intake(ctx, *id).await?),
            IntakeCommands::List { owner } => {
                let owner = owner.as_deref().unwrap_or(ctx.principal().id());
                print_json(&app.workflow.fetch_intakes_by_owner(ctx, owner).await?)
            }
            IntakeCommands::Update { file } => {
                let intake: SystemIntake = read_json(file).await?;
                print_json(&app.workflow.update_intake(ctx, intake).await?)
            }
            IntakeCommands::Archive { id } => {
                print_json(&app.workflow.archive_intake(ctx, *id).await?)
            }
        }
    }
}
