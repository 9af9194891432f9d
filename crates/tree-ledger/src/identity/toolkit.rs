use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::{IdentityError, IdentityVerifier, VerifiedUser};
use crate::config::IdentityConfig;

/// Verifies Firebase ID tokens through the Identity Toolkit `accounts:lookup` endpoint.
#[derive(Debug, Clone)]
pub struct IdentityToolkitVerifier {
    client: reqwest::Client,
    lookup_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityToolkitVerifier {
    pub fn new(client: reqwest::Client, config: &IdentityConfig) -> Self {
        Self {
            client,
            lookup_url: format!("{}/v1/accounts:lookup", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError> {
        let response = self
            .client
            .post(&self.lookup_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "idToken": token }))
            .send()
            .await
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let reason = response
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "token verification failed".to_string());
            warn!(%reason, "identity provider rejected token");
            return Err(IdentityError::Rejected(reason));
        }
        if !status.is_success() {
            return Err(IdentityError::Unavailable(format!(
                "identity provider returned http status {status}"
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|err| IdentityError::Unavailable(err.to_string()))?;

        body.users
            .into_iter()
            .next()
            .map(|user| VerifiedUser {
                uid: user.local_id,
                email: user.email,
                display_name: user.display_name,
            })
            .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))
    }
}
