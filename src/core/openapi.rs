use utoipa::{Modify, OpenApi};

use crate::features::submissions::{dtos as submissions_dtos, handlers as submissions_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Submissions (public)
        submissions_handlers::save_location,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Submissions
            submissions_dtos::SaveLocationDto,
            submissions_dtos::SaveLocationResponseDto,
            submissions_dtos::QrDataDto,
        )
    ),
    tags(
        (name = "submissions", description = "Donor location submissions (public)"),
    ),
    info(
        title = "Donor Locator API",
        version = "0.1.0",
        description = "Blood donor location verification API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
