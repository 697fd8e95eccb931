//! Tessera Serve - authenticated HTTP API for the Tessera editor.
//!
//! Exposes tile editing, settings, preview and publishing over JSON so an
//! editor UI can drive them. The published page itself is a static file and
//! is not served from here.
//!
//! # Authentication
//!
//! Everything under `/api/v1` requires Bearer token authentication. Tokens
//! are configured via environment variables (typically in a `.env` file).
//!
//! # Architecture
//!
//! - **AppState**: Shared application state (configuration, stores, generator)
//! - **Auth**: Bearer token middleware for request authentication
//! - **Routes**: Endpoint handlers grouped by domain
//!
//! # Responses
//!
//! Successful responses are `{"success": true, "data": ...}`; errors are
//! `{"success": false, "errors": [...]}`.

mod auth;
mod error;
mod routes;
mod state;

pub use self::auth::require_auth;
pub use self::error::ApiError;
pub use self::routes::router;
pub use self::state::{AppState, Config};
