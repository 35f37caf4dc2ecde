use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for the intake workflow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeWorkflowConfig {
    /// Deployment environment; `local` swaps in stand-ins for external systems
    pub environment: String,
    pub store: StoreConfig,
    pub submission: SubmissionConfig,
    pub directory: DirectoryConfig,
    pub notifications: NotificationConfig,
    pub auth: AuthConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// JSON document used by the file store
    pub path: PathBuf,
    /// SQLite URL; takes precedence over `path` when built with `database`
    pub database_url: Option<String>,
    /// Run migrations on connect
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
    pub base_url: String,
    /// Gateway API key (can be set via env var)
    pub api_key: Option<String>,
    pub rate_limit: RateLimitConfig,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub rate_limit: RateLimitConfig,
    pub timeout_seconds: u64,
    /// Domain used by the local directory stand-in
    pub local_email_domain: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Where submission notices go
    pub review_team_address: String,
    /// Base URL used for links in email bodies
    pub app_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Job code granting basic application access
    pub user_job_code: String,
    /// Job code granting the governance reviewer capability
    pub reviewer_job_code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_capacity: 20,
        }
    }
}

impl Default for IntakeWorkflowConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            store: StoreConfig {
                path: PathBuf::from(".intake-workflow/store.json"),
                database_url: None,
                auto_migrate: true,
            },
            submission: SubmissionConfig {
                base_url: "http://localhost:8081/gateway/CEDAR Intake/1.0".to_string(),
                api_key: None,
                rate_limit: RateLimitConfig::default(),
                timeout_seconds: 30,
            },
            directory: DirectoryConfig {
                base_url: "http://localhost:8081/gateway/LDAP/1.0".to_string(),
                api_key: None,
                rate_limit: RateLimitConfig::default(),
                timeout_seconds: 10,
                local_email_domain: "local.example.com".to_string(),
            },
            notifications: NotificationConfig {
                review_team_address: "grt@local.example.com".to_string(),
                app_url: "http://localhost:3000".to_string(),
            },
            auth: AuthConfig {
                user_job_code: "EASI_P_USER".to_string(),
                reviewer_job_code: "EASI_D_GOVTEAM".to_string(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl IntakeWorkflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (intake-workflow.toml, .intake-workflow-rc)
    /// 3. Environment variables (prefixed with INTAKE_WORKFLOW_, nested keys
    ///    joined with `__`)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`load`](Self::load) with config files looked up under `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let toml_file = dir.join("intake-workflow.toml");
        if toml_file.exists() {
            builder = builder.add_source(File::from(toml_file));
        }

        let rc_file = dir.join(".intake-workflow-rc");
        if rc_file.exists() {
            builder = builder.add_source(File::from(rc_file).format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("INTAKE_WORKFLOW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: IntakeWorkflowConfig = builder.build()?.try_deserialize()?;

        // Both gateways share one key unless configured separately
        if loaded.submission.api_key.is_none() {
            loaded.submission.api_key = std::env::var("CEDAR_API_KEY").ok();
        }
        if loaded.directory.api_key.is_none() {
            loaded.directory.api_key = loaded.submission.api_key.clone();
        }

        Ok(loaded)
    }

    pub fn is_local(&self) -> bool {
        self.environment.eq_ignore_ascii_case("local")
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
