//! Clinical laboratory domain records and their resource descriptors.
//!
//! # Responsibility
//! - Define the flat records persisted by the store (`Laboratorio`,
//!   `Laboratory`, `Sample`).
//! - Declare, per record, the static descriptor the generic CRUD pipeline
//!   is parameterised over.
//!
//! # Invariants
//! - Identity is store-assigned; `None` only before the first insert.
//! - JSON keys of a record equal the field names of its descriptor.

pub mod descriptor;
pub mod laboratorio;
pub mod laboratory;
pub mod sample;
pub mod state;

pub use descriptor::{
    record_from_fields, record_to_fields, FieldPattern, FieldRule, FieldSpec, FilterSpec,
    RecordId, Resource, ResourceDescriptor, ID_FIELD,
};
pub use laboratorio::Laboratorio;
pub use laboratory::Laboratory;
pub use sample::Sample;
pub use state::OperationalState;
