use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::submissions::dtos::{QrDataDto, SaveLocationResponseDto};

/// Database model for a stored location submission. Rows are never updated.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct LocationSubmission {
    pub id: Uuid,
    pub donor_id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub mobile_number: Option<String>,
    pub request_id: Option<String>,
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a submission; `created_at` is assigned by the store
#[derive(Debug, Clone)]
pub struct NewLocationSubmission {
    pub donor_id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub mobile_number: Option<String>,
    pub request_id: Option<String>,
    pub token: Option<String>,
}

impl NewLocationSubmission {
    /// Display string stored alongside the coordinates
    pub fn format_address(mobile_number: Option<&str>, latitude: f64, longitude: f64) -> String {
        format!(
            "Mobile: {} - Current Location: {}, {}",
            mobile_number.unwrap_or("unknown"),
            latitude,
            longitude
        )
    }
}

impl From<LocationSubmission> for SaveLocationResponseDto {
    fn from(s: LocationSubmission) -> Self {
        Self {
            message: "Saved".to_string(),
            accuracy: s.accuracy,
            timestamp: s.created_at,
            donor_id: s.donor_id.clone(),
            qr_data: QrDataDto {
                donor_id: s.donor_id,
                mobile_number: s.mobile_number,
                latitude: s.latitude,
                longitude: s.longitude,
                timestamp: s.created_at,
                request_id: s.request_id,
                token: s.token,
            },
        }
    }
}
