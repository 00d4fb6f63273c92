use std::net::IpAddr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::IpCheckConfig;
use crate::features::ip_check::clients::IpGeolocationProvider;
use crate::features::ip_check::models::{IpLookup, IpLookupError};

/// ip-api.com JSON response, restricted to the requested fields
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    hosting: bool,
}

impl IpApiResponse {
    fn into_lookup(self) -> Result<IpLookup, IpLookupError> {
        if self.status != "success" {
            let reason = self.message.unwrap_or(self.status);
            return Err(IpLookupError::Unsuccessful(reason));
        }

        Ok(IpLookup {
            lat: self.lat,
            lon: self.lon,
            proxy: self.proxy,
            hosting: self.hosting,
        })
    }
}

/// Client for the ip-api.com JSON endpoint
pub struct IpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    const FIELDS: &'static str = "status,message,lat,lon,proxy,hosting";

    pub fn new(config: &IpCheckConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("DonorLocator/1.0 (location-verification)")
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl IpGeolocationProvider for IpApiClient {
    async fn lookup(&self, ip: IpAddr) -> Result<IpLookup, IpLookupError> {
        let url = format!("{}/json/{}", self.base_url, ip);
        tracing::debug!("IP lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("fields", Self::FIELDS)])
            .send()
            .await
            .map_err(|e| IpLookupError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IpLookupError::HttpStatus(response.status().as_u16()));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| IpLookupError::Malformed(e.to_string()))?;

        body.into_lookup()
    }
}
