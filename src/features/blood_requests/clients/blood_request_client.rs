use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::features::blood_requests::clients::BloodRequestDirectory;
use crate::features::blood_requests::models::{BloodRequestError, BloodRequestStatus};

#[derive(Debug, Deserialize)]
struct BloodRequestResponse {
    status: BloodRequestStatus,
}

/// HTTP client for the blood request service (`GET {base}/api/bloodrequest/{reference}`)
pub struct BloodRequestApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl BloodRequestApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl BloodRequestDirectory for BloodRequestApiClient {
    async fn status(
        &self,
        reference: &str,
    ) -> Result<Option<BloodRequestStatus>, BloodRequestError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| BloodRequestError::Request(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| BloodRequestError::Request("base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["api", "bloodrequest", reference]);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BloodRequestError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BloodRequestError::HttpStatus(response.status().as_u16()));
        }

        let body: BloodRequestResponse = response
            .json()
            .await
            .map_err(|e| BloodRequestError::Malformed(e.to_string()))?;

        Ok(Some(body.status))
    }
}
