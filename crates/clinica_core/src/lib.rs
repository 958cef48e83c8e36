//! Core domain logic for the clinical laboratory admin backend.
//!
//! Three flat resources (`Laboratorio`, `Laboratory`, `Sample`) share one
//! generic pipeline: validation → duplicate check → persistence → error
//! mapping, parameterised by a static `ResourceDescriptor`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Laboratorio, Laboratory, OperationalState, RecordId, Resource, ResourceDescriptor, Sample,
};
pub use repo::resource_repo::{RepoError, RepoResult, ResourceRepository, SqliteResourceRepository};
pub use service::crud_service::{CrudError, CrudResult, CrudService};
pub use validation::{validate_fields, validate_record, ValidationErrors};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
