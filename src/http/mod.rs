//! HTTP server module.
//!
//! Serves plain HTTP on the configured address; TLS is expected to be
//! terminated by a reverse proxy in front of the service. The server shuts
//! down gracefully on SIGTERM/SIGINT, draining open connections first.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
