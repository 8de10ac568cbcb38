//! OpenAPI document describing the public routes.

use utoipa::OpenApi;

use crate::routes::{health, root};

/// API Documentation
///
/// `info.version` is left out so utoipa fills it from the crate version.
#[derive(OpenApi)]
#[openapi(
    paths(root::root, health::health),
    tags(
        (name = "Root", description = "Service greeting"),
        (name = "Health", description = "Liveness and readiness probing"),
    ),
    info(
        title = "IntelliView API",
        description = "Backend API for the AI-powered interview platform."
    )
)]
pub struct ApiDoc;
