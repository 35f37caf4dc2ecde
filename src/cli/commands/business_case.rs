use anyhow::Result;

use super::{print_json, read_json, App, Command};
use crate::cli::BusinessCaseCommands;
use crate::models::BusinessCase;

pub struct BusinessCaseCommand {
    pub command: BusinessCaseCommands,
}

impl BusinessCaseCommand {
    pub fn new(command: BusinessCaseCommands) -> Self {
        Self { command }
    }
}

impl Command for BusinessCaseCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let ctx = &app.ctx;
        match &self.command {
            BusinessCaseCommands::Create { file } => {
                let business_case: BusinessCase = read_json(file).await?;
                print_json(&app.workflow.create_business_case(ctx, business_case).await?)
            }
            BusinessCaseCommands::Show { id } => {
                print_json(&app.workflow.fetch_business_case(ctx, *id).await?)
            }
            BusinessCaseCommands::List { owner } => {
                let owner = owner.as_deref().unwrap_or(ctx.principal().id());
                print_json(&app.workflow.fetch_business_cases_by_owner(ctx, owner).await?)
            }
            BusinessCaseCommands::Archive { id } => {
                print_json(&app.workflow.archive_business_case(ctx, *id).await?)
            }
        }
    }
}
