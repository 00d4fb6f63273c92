//! Submission routes

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::submissions::handlers;
use crate::features::submissions::services::SubmissionService;

/// Create routes for the submissions feature
///
/// Public (no authentication): the endpoint is opened from a link sent to
/// potential donors.
pub fn routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/save-location", post(handlers::save_location))
        .with_state(service)
}
