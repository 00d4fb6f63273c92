//! Submission orchestration: validate, check, mint a donor id, store.

use std::net::IpAddr;
use std::sync::Arc;

use validator::Validate;

use crate::core::config::DonorIdConfig;
use crate::core::error::{AppError, Result};
use crate::features::blood_requests::RequestStatusGate;
use crate::features::geofence::GeofenceValidator;
use crate::features::ip_check::IpCheckService;
use crate::features::submissions::dtos::{SaveLocationDto, SaveLocationResponseDto};
use crate::features::submissions::models::{LocationSubmission, NewLocationSubmission};
use crate::features::submissions::services::{DonorIdGenerator, RandomDonorIdGenerator};
use crate::features::submissions::store::{StoreError, SubmissionStore};
use crate::shared::validation::DONOR_ID_REGEX;

/// Trimmed, non-empty optional string
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reject missing, non-finite or out-of-range input. Runs before anything else.
fn validate_input(dto: &SaveLocationDto) -> Result<(f64, f64)> {
    let (Some(latitude), Some(longitude)) = (dto.latitude, dto.longitude) else {
        return Err(AppError::InvalidInput("Coordinates required".to_string()));
    };

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(AppError::InvalidInput(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::InvalidInput(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::InvalidInput(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    if let Some(accuracy) = dto.accuracy {
        if !accuracy.is_finite() || accuracy < 0.0 {
            return Err(AppError::InvalidInput(
                "Accuracy must be a non-negative number".to_string(),
            ));
        }
    }

    dto.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    Ok((latitude, longitude))
}

/// Service for accepting donor location submissions
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    id_generator: Arc<dyn DonorIdGenerator>,
    geofence: GeofenceValidator,
    request_gate: Arc<RequestStatusGate>,
    ip_check: Arc<IpCheckService>,
    max_id_attempts: u32,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        geofence: GeofenceValidator,
        request_gate: Arc<RequestStatusGate>,
        ip_check: Arc<IpCheckService>,
        donor_id: DonorIdConfig,
    ) -> Self {
        Self {
            store,
            id_generator: Arc::new(RandomDonorIdGenerator),
            geofence,
            request_gate,
            ip_check,
            max_id_attempts: donor_id.max_attempts.max(1),
        }
    }

    /// Replace the donor id source
    #[cfg(test)]
    pub fn with_id_generator(mut self, id_generator: Arc<dyn DonorIdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Validate and store a submission.
    ///
    /// Checks run in order and short-circuit: input, geofence, request status,
    /// IP cross-check. Nothing is written unless all of them pass.
    pub async fn submit(
        &self,
        dto: SaveLocationDto,
        client_ip: Option<IpAddr>,
    ) -> Result<SaveLocationResponseDto> {
        let (latitude, longitude) = validate_input(&dto)?;

        let distance = self.geofence.distance_from_reference(latitude, longitude);
        if !self.geofence.contains(latitude, longitude) {
            tracing::info!(
                "Submission outside geofence: distance={:.2}km, radius={:.2}km",
                distance,
                self.geofence.radius_km()
            );
            return Err(AppError::OutOfBounds("Outside allowed area".to_string()));
        }

        let mobile_number = normalize(dto.mobile_number);
        let request_id = normalize(dto.request_id);
        let token = normalize(dto.token);

        self.request_gate
            .ensure_open(request_id.as_deref(), token.as_deref())
            .await?;

        self.ip_check.verify(client_ip, latitude, longitude).await?;

        let draft = NewLocationSubmission {
            donor_id: String::new(),
            address: NewLocationSubmission::format_address(
                mobile_number.as_deref(),
                latitude,
                longitude,
            ),
            latitude,
            longitude,
            accuracy: dto.accuracy,
            mobile_number,
            request_id,
            token,
        };

        let record = self.insert_with_unique_id(draft).await?;

        tracing::info!(
            "Location saved: donor_id={}, distance={:.2}km, request_id={:?}",
            record.donor_id,
            distance,
            record.request_id
        );

        Ok(record.into())
    }

    /// Mint a donor id and insert, regenerating on collision.
    ///
    /// The `exists` probe only skips ids that are already taken; the store's
    /// unique constraint is authoritative, so a concurrent request claiming the
    /// same id between probe and insert surfaces as `UniqueViolation` and is
    /// retried like any other failed attempt.
    async fn insert_with_unique_id(
        &self,
        draft: NewLocationSubmission,
    ) -> Result<LocationSubmission> {
        let mut last_error = String::from("no attempt made");

        for attempt in 1..=self.max_id_attempts {
            let donor_id = self.id_generator.generate();
            if !DONOR_ID_REGEX.is_match(&donor_id) {
                return Err(AppError::Internal(format!(
                    "donor id generator produced malformed id {:?}",
                    donor_id
                )));
            }

            match self.store.exists(&donor_id).await {
                Ok(true) => {
                    tracing::debug!("Donor id {} already taken (attempt {})", donor_id, attempt);
                    last_error = format!("donor id {} already taken", donor_id);
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    // The insert below still enforces uniqueness
                    tracing::warn!("Donor id probe failed: {}", e);
                }
            }

            let candidate = NewLocationSubmission {
                donor_id: donor_id.clone(),
                ..draft.clone()
            };

            match self.store.insert(candidate).await {
                Ok(record) if record.donor_id == donor_id => return Ok(record),
                Ok(record) => {
                    return Err(AppError::Internal(format!(
                        "store returned donor id {} for candidate {}",
                        record.donor_id, donor_id
                    )));
                }
                Err(StoreError::UniqueViolation(id)) => {
                    tracing::warn!(
                        "Donor id collision on insert: {} (attempt {}/{})",
                        id,
                        attempt,
                        self.max_id_attempts
                    );
                    last_error = format!("donor id {} already taken", id);
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to insert location submission (attempt {}/{}): {}",
                        attempt,
                        self.max_id_attempts,
                        e
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(AppError::Storage(format!(
            "failed to store submission after {} attempts: {}",
            self.max_id_attempts, last_error
        )))
    }
}
