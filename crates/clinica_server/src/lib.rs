//! HTTP transport for the clinical laboratory admin backend.
//!
//! # Responsibility
//! - Convert HTTP requests into typed CRUD commands for `clinica_core`.
//! - Map use-case outcomes to status codes and JSON bodies.
//!
//! # Invariants
//! - Every resource is served by the same generic handler set, instantiated
//!   from its static descriptor.
//! - Store work never runs on the async executor threads.

pub mod config;
pub mod error;
pub mod handlers;
pub mod request_log;
pub mod router;
pub mod state;

pub use config::{DatabaseLocation, ServerConfig};
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
