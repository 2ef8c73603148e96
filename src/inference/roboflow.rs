use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::inference::InferenceClient;
use crate::models::ModelId;

/// Client for Roboflow's hosted (serverless) inference API.
pub struct RoboflowClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl RoboflowClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from settings. Fails before any network activity when no key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.api_key()?;
        Self::new(
            settings.api_url.clone(),
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Endpoint for a model, without the credential.
    pub fn endpoint(&self, model: &ModelId) -> String {
        format!("{}/{}", self.api_url, model.as_str().trim_matches('/'))
    }
}

#[async_trait]
impl InferenceClient for RoboflowClient {
    async fn infer(&self, image: &Path, model: &ModelId) -> Result<Value> {
        let bytes = tokio::fs::read(image).await?;
        let body = BASE64_STANDARD.encode(&bytes);
        let url = self.endpoint(model);

        debug!(%url, bytes = bytes.len(), "sending inference request");

        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::InferenceCall(format!("{url} returned {status}: {text}")));
        }

        let value = serde_json::from_str(&text).map_err(|e| {
            Error::InferenceCall(format!("{url} returned a non-JSON body: {e}"))
        })?;

        info!(%model, "inference call succeeded");
        Ok(value)
    }
}
