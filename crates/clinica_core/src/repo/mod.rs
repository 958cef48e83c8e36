//! Store gateway contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow persistence port consumed by the CRUD service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must pass `validate_record()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod resource_repo;
