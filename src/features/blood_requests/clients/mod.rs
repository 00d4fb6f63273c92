mod blood_request_client;

use async_trait::async_trait;

use crate::features::blood_requests::models::{BloodRequestError, BloodRequestStatus};

pub use blood_request_client::BloodRequestApiClient;

/// Lookup of external blood request records by request id or token
#[async_trait]
pub trait BloodRequestDirectory: Send + Sync {
    /// `Ok(None)` when the directory does not know the reference
    async fn status(&self, reference: &str)
        -> Result<Option<BloodRequestStatus>, BloodRequestError>;
}
