use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for a location submission.
///
/// Coordinates are optional at the type level so that a missing value is
/// reported as invalid input instead of a JSON parse failure. Numeric ranges
/// are checked by the submission service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLocationDto {
    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Reported GPS accuracy in meters
    pub accuracy: Option<f64>,

    #[validate(length(max = 32, message = "Mobile number must not exceed 32 characters"))]
    pub mobile_number: Option<String>,

    /// Verification token from the request link
    #[validate(length(max = 256, message = "Token must not exceed 256 characters"))]
    pub token: Option<String>,

    /// Blood request correlation id
    #[validate(length(max = 256, message = "Request id must not exceed 256 characters"))]
    pub request_id: Option<String>,
}

/// Payload for downstream donor card rendering
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrDataDto {
    pub donor_id: String,
    pub mobile_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
    pub token: Option<String>,
}

/// Response DTO for an accepted submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLocationResponseDto {
    pub message: String,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub donor_id: String,
    pub qr_data: QrDataDto,
}
