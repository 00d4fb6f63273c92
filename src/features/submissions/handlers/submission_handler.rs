//! Location submission handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, ClientIp};
use crate::features::submissions::dtos::{SaveLocationDto, SaveLocationResponseDto};
use crate::features::submissions::services::SubmissionService;
use crate::shared::types::ErrorResponse;

/// Submit the donor's current location
///
/// Public endpoint. The location must lie inside the geofence and pass the
/// anti-spoofing checks; on success a donor id is minted and returned together
/// with the data for the donor card.
#[utoipa::path(
    post,
    path = "/api/save-location",
    request_body = SaveLocationDto,
    responses(
        (status = 200, description = "Location saved", body = SaveLocationResponseDto),
        (status = 400, description = "Invalid input, outside allowed area, spoofing suspected or request closed", body = ErrorResponse),
        (status = 500, description = "Storage or internal error", body = ErrorResponse)
    ),
    tag = "submissions"
)]
pub async fn save_location(
    State(service): State<Arc<SubmissionService>>,
    ClientIp(client_ip): ClientIp,
    AppJson(dto): AppJson<SaveLocationDto>,
) -> Result<Json<SaveLocationResponseDto>> {
    let response = service.submit(dto, client_ip).await?;
    Ok(Json(response))
}
