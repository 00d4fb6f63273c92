use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::blood_requests::clients::BloodRequestDirectory;
use crate::features::blood_requests::models::BloodRequestStatus;

/// Rejects submissions that point at a closed blood request
pub struct RequestStatusGate {
    directory: Option<Arc<dyn BloodRequestDirectory>>,
}

impl RequestStatusGate {
    pub fn new(directory: Arc<dyn BloodRequestDirectory>) -> Self {
        Self {
            directory: Some(directory),
        }
    }

    /// Gate that accepts everything (no directory configured)
    pub fn disabled() -> Self {
        Self { directory: None }
    }

    /// Check the request referenced by `request_id`, falling back to `token`.
    /// Unknown references and directory failures are let through.
    pub async fn ensure_open(&self, request_id: Option<&str>, token: Option<&str>) -> Result<()> {
        let Some(directory) = &self.directory else {
            return Ok(());
        };
        let Some(reference) = request_id.or(token) else {
            return Ok(());
        };

        match directory.status(reference).await {
            Ok(Some(BloodRequestStatus::Closed)) => {
                tracing::info!("Submission for closed blood request: {}", reference);
                Err(AppError::RequestClosed(
                    "This blood request is closed".to_string(),
                ))
            }
            Ok(Some(status)) => {
                tracing::debug!("Blood request {} status: {:?}", reference, status);
                Ok(())
            }
            Ok(None) => {
                tracing::warn!("Blood request {} not found in directory", reference);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Blood request status check failed (non-blocking): reference={}, error={}",
                    reference,
                    e
                );
                Ok(())
            }
        }
    }
}
