//! IntelliView API: backend service bootstrap for the interview platform.
//!
//! The library builds the complete axum application (`routes::create_router`)
//! so it can be mounted by an external server; the `intelliview` binary loads
//! configuration and serves it on its own listener.

pub mod config;
pub mod cors;
pub mod doc;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
