//! HTTP route handlers.
//!
//! The router serves the greeting, the liveness probe, the OpenAPI document
//! and the Swagger UI. The application routes answer GET only; every other
//! method, HEAD included, gets a JSON 405.
//!
//! Every route, including the fallbacks, sits behind the CORS layer and the
//! request ID middleware. An OPTIONS request without `Origin` and
//! `Access-Control-Request-Method` is not a preflight and skips the CORS
//! layer so the router can answer it with 404 or 405.

pub mod health;
pub mod root;

use axum::{
    extract::{Request, State},
    handler::Handler,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use http::header::{HeaderValue, ACCESS_CONTROL_REQUEST_METHOD, CACHE_CONTROL, ORIGIN};
use http::Method;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{ConfigError, CACHE_CONTROL_NO_STORE, OPENAPI_PATH, SWAGGER_UI_PATH};
use crate::cors::cors_layer;
use crate::doc::ApiDoc;
use crate::error::{panic_response, AppError};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Fallback for unmatched paths.
async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for matched paths with an unsupported method.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// A GET route that refuses HEAD instead of answering it with the GET handler.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler).head(method_not_allowed)
}

/// A CORS preflight is an OPTIONS request carrying both `Origin` and
/// `Access-Control-Request-Method`.
fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(ORIGIN)
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Sends non-preflight OPTIONS requests straight to the router, past the
/// CORS layer, which would otherwise answer every OPTIONS with 200.
async fn preflight_guard(State(router): State<Router>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(&request) {
        return match router.oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    }

    next.run(request).await
}

/// Creates the Axum router with all routes and layers.
///
/// Fails only if the CORS section of the configuration cannot be turned into
/// header values, which `AppConfig::validate` already rules out for loaded
/// configurations.
pub fn create_router(state: AppState) -> Result<Router, ConfigError> {
    let cors = cors_layer(&state.config.cors)?;

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new()
        .route("/health", get_only(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let root_routes = Router::new().route("/", get_only(root::root));

    let doc_routes = SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, ApiDoc::openapi());

    let app = Router::new()
        .merge(root_routes)
        .merge(health_routes)
        .merge(doc_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        // Panicking handlers answer 500 instead of dropping the connection
        .layer(CatchPanicLayer::custom(panic_response));

    Ok(app
        .clone()
        .layer(cors)
        .layer(middleware::from_fn_with_state(app, preflight_guard))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer)))
}
