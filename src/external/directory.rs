// HTTP client for the user directory

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{ClientError, DirectoryApi};
use crate::http::RateLimitedHttpClient;

#[derive(Debug, Deserialize)]
struct PersonResponse {
    #[serde(default)]
    email: Option<String>,
}

pub struct HttpDirectoryClient {
    http: RateLimitedHttpClient,
}

impl HttpDirectoryClient {
    pub fn new(http: RateLimitedHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn lookup_email(&self, user_id: &str) -> Result<String, ClientError> {
        let person: PersonResponse = self
            .http
            .get_json(&["directory", "person", user_id])
            .await?;

        let email = person.email.unwrap_or_default();
        if email.is_empty() {
            warn!(user_id = %user_id, "Directory returned no email address");
        }
        Ok(email)
    }
}
