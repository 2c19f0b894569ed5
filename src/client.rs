use serde::{Deserialize, Serialize};
use url::Url;

use crate::entities::contact::RateLimitInfo;

/// Joined onto the base URL, keeping any path prefix it carries.
pub const CONTACT_PATH: &str = "api/contact";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Serialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Normalized outcome of a submission. Every failure path ends up here with
/// `success == false`; nothing is ever raised to the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub rate_limit: Option<RateLimitInfo>,
    #[serde(default)]
    pub retry_after: Option<u64>,
}

impl ContactFormResult {
    pub fn failure(error: impl Into<String>) -> Self {
        ContactFormResult {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Thin client for the contact endpoint, used by the site and by tooling.
#[derive(Debug, Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ContactClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(CONTACT_PATH)?;
        Ok(ContactClient { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn send_contact_form(&self, data: &ContactFormData) -> ContactFormResult {
        let response = match self.http.post(self.endpoint.clone()).json(data).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Contact request did not reach the server: {}", e);
                return ContactFormResult::failure(NETWORK_ERROR);
            }
        };

        let status = response.status();
        match response.json::<ContactFormResult>().await {
            Ok(mut result) => {
                if !status.is_success() {
                    result.success = false;
                }
                result
            }
            Err(e) => {
                tracing::warn!("Undecodable contact response ({}): {}", status, e);
                ContactFormResult::failure(format!(
                    "Request failed with status {}",
                    status.as_u16()
                ))
            }
        }
    }

    /// True when the liveness probe answers with a non-error status.
    pub async fn is_reachable(&self) -> bool {
        self.http
            .get(self.endpoint.clone())
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }
}
