mod ip_api_client;

use std::net::IpAddr;

use async_trait::async_trait;

use crate::features::ip_check::models::{IpLookup, IpLookupError};

pub use ip_api_client::IpApiClient;

/// External IP geolocation lookup
#[async_trait]
pub trait IpGeolocationProvider: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Result<IpLookup, IpLookupError>;
}
