use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::auth::PrincipalResolver;
use crate::cli::PrincipalArgs;
use crate::config::{IntakeWorkflowConfig, RateLimitConfig};
use crate::external::{
    DirectoryApi, HttpDirectoryClient, HttpSubmissionClient, LocalDirectoryApi,
    LocalSubmissionApi, SubmissionApi,
};
use crate::http::RateLimitedHttpClient;
use crate::notify::LogNotifier;
use crate::store::{FileStore, IntakeStore};
use crate::workflow::{Collaborators, IntakeWorkflow, RequestContext};

pub mod business_case;
pub mod intake;

pub use business_case::BusinessCaseCommand;
pub use intake::IntakeCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, app: &App) -> Result<()>;
}

/// Wired-up workflow plus the principal the command acts as
pub struct App {
    pub workflow: IntakeWorkflow,
    pub ctx: RequestContext,
}

impl App {
    pub async fn from_config(config: &IntakeWorkflowConfig, principal: &PrincipalArgs) -> Result<Self> {
        let resolver = PrincipalResolver::new(&config.auth.user_job_code, &config.auth.reviewer_job_code);
        let user = resolver.resolve(principal.user.as_deref(), &principal.job_codes)?;

        let store = build_store(config).await?;
        let (submission, directory) = build_external(config)?;
        let notifier = Arc::new(LogNotifier::new(
            &config.notifications.review_team_address,
            &config.notifications.app_url,
        ));

        let workflow = IntakeWorkflow::new(Collaborators::new(store, submission, directory, notifier));
        Ok(Self {
            workflow,
            ctx: RequestContext::new(user),
        })
    }
}

async fn build_store(config: &IntakeWorkflowConfig) -> Result<Arc<dyn IntakeStore>> {
    #[cfg(feature = "database")]
    if let Some(url) = &config.store.database_url {
        let store = crate::store::SqliteStore::connect(url, config.store.auto_migrate)
            .await
            .with_context(|| format!("failed to open database {url}"))?;
        info!(url = %url, "Using SQLite store");
        return Ok(Arc::new(store));
    }

    if let Some(parent) = config.store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    info!(path = %config.store.path.display(), "Using file store");
    Ok(Arc::new(FileStore::new(&config.store.path)))
}

fn gateway_client(
    base_url: &str,
    api_key: Option<String>,
    rate_limit: &RateLimitConfig,
    timeout_seconds: u64,
) -> Result<RateLimitedHttpClient> {
    Ok(RateLimitedHttpClient::new(
        base_url,
        api_key,
        rate_limit.requests_per_second,
        rate_limit.burst_capacity,
        Duration::from_secs(timeout_seconds),
    )?)
}

fn build_external(
    config: &IntakeWorkflowConfig,
) -> Result<(Arc<dyn SubmissionApi>, Arc<dyn DirectoryApi>)> {
    if config.is_local() {
        info!("Local environment: using stand-in submission API and directory");
        return Ok((
            Arc::new(LocalSubmissionApi),
            Arc::new(LocalDirectoryApi::new(&config.directory.local_email_domain)),
        ));
    }

    let submission = gateway_client(
        &config.submission.base_url,
        config.submission.api_key.clone(),
        &config.submission.rate_limit,
        config.submission.timeout_seconds,
    )?;
    let directory = gateway_client(
        &config.directory.base_url,
        config.directory.api_key.clone(),
        &config.directory.rate_limit,
        config.directory.timeout_seconds,
    )?;
    Ok((
        Arc::new(HttpSubmissionClient::new(submission)),
        Arc::new(HttpDirectoryClient::new(directory)),
    ))
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
