//! Service greeting.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::WELCOME_MESSAGE;

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    /// Fixed greeting
    #[schema(example = "Welcome to IntelliView API!")]
    pub message: String,
}

/// Returns the fixed welcome message
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    ),
    tag = "Root"
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}
