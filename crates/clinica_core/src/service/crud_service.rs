//! Generic CRUD use-case service.
//!
//! # Responsibility
//! - Run the validation → duplicate check → persistence pipeline for any
//!   descriptor-declared resource.
//! - Translate repository outcomes into the use-case error taxonomy.
//!
//! # Invariants
//! - The service holds no state besides its repository.
//! - Create never trusts a caller-supplied identity.
//! - Update overwrites exactly the descriptor's mutable fields and keeps the
//!   stored identity.
//! - Logs carry resource name, identity and outcome only, never field values.

use crate::model::descriptor::{record_from_fields, record_to_fields, RecordId, Resource, ID_FIELD};
use crate::repo::resource_repo::{RepoError, ResourceRepository};
use crate::validation::{validate_record, ValidationErrors};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type CrudResult<T> = Result<T, CrudError>;

/// Service error for CRUD use-cases.
#[derive(Debug)]
pub enum CrudError {
    /// One or more fields violate their declared constraint.
    Validation(ValidationErrors),
    /// No record with this identity exists.
    NotFound {
        resource: &'static str,
        id: RecordId,
    },
    /// Another record already holds the same duplicate key.
    DuplicateKey {
        resource: &'static str,
        fields: &'static [&'static str],
    },
    /// Persistence-layer failure.
    Store(RepoError),
}

impl Display for CrudError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::DuplicateKey { resource, fields } => write!(
                f,
                "a {resource} with the same {} already exists",
                fields.join(", ")
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CrudError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CrudError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CrudError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { resource, id } => Self::NotFound { resource, id },
            RepoError::Duplicate { resource, fields } => Self::DuplicateKey { resource, fields },
            other => Self::Store(other),
        }
    }
}

impl From<serde_json::Error> for CrudError {
    fn from(value: serde_json::Error) -> Self {
        Self::Store(RepoError::from(value))
    }
}

/// CRUD pipeline over one resource repository.
pub struct CrudService<R, Repo> {
    repo: Repo,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource, Repo: ResourceRepository<R>> CrudService<R, Repo> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: Repo) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    /// Lists every persisted record.
    pub fn list(&self) -> CrudResult<Vec<R>> {
        let records = self.repo.list_all()?;
        info!(
            "event=resource_list module=service resource={} status=ok count={}",
            R::descriptor().name,
            records.len()
        );
        Ok(records)
    }

    /// Gets one record by identity.
    pub fn get(&self, id: RecordId) -> CrudResult<R> {
        let name = R::descriptor().name;
        match self.repo.find_by_id(id)? {
            Some(record) => Ok(record),
            None => {
                info!("event=resource_get module=service resource={name} status=not_found id={id}");
                Err(CrudError::NotFound { resource: name, id })
            }
        }
    }

    /// Creates a record after validation and a case-insensitive duplicate scan.
    ///
    /// # Contract
    /// - Any identity on `record` is discarded; the store assigns one.
    /// - Fails with `DuplicateKey` when a persisted record has the same
    ///   duplicate-key tuple, compared case-insensitively.
    /// - The store's unique index covers creates racing past the scan.
    pub fn create(&self, mut record: R) -> CrudResult<R> {
        let descriptor = R::descriptor();
        record.set_id(None);
        validate_record(&record)?;

        let candidate = descriptor.duplicate_key_of(&record_to_fields(&record)?);
        for existing in self.repo.list_all()? {
            if descriptor.duplicate_key_of(&record_to_fields(&existing)?) == candidate {
                warn!(
                    "event=resource_create module=service resource={} status=rejected reason=duplicate_key existing_id={}",
                    descriptor.name,
                    existing.id().unwrap_or_default()
                );
                return Err(CrudError::DuplicateKey {
                    resource: descriptor.name,
                    fields: descriptor.duplicate_key,
                });
            }
        }

        let stored = self.repo.insert(&record)?;
        info!(
            "event=resource_create module=service resource={} status=ok id={}",
            descriptor.name,
            stored.id().unwrap_or_default()
        );
        Ok(stored)
    }

    /// Replaces the mutable fields of an existing record.
    ///
    /// # Contract
    /// - `incoming` is validated before the lookup.
    /// - The path identity wins over any identity carried by `incoming`.
    /// - No service-level duplicate scan; the unique index still rejects a
    ///   key taken by another record.
    pub fn update(&self, id: RecordId, incoming: R) -> CrudResult<R> {
        let descriptor = R::descriptor();
        validate_record(&incoming)?;

        let current = self.get(id)?;
        let mut fields = record_to_fields(&current)?;
        let incoming_fields = record_to_fields(&incoming)?;
        for name in descriptor.mutable_fields {
            let value = incoming_fields.get(*name).cloned().unwrap_or(Value::Null);
            fields.insert((*name).to_string(), value);
        }
        fields.insert(ID_FIELD.to_string(), Value::from(id));

        let updated: R = record_from_fields(fields)?;
        let stored = self.repo.upsert(&updated)?;
        info!(
            "event=resource_update module=service resource={} status=ok id={id}",
            descriptor.name
        );
        Ok(stored)
    }

    /// Deletes a record by identity.
    ///
    /// A second delete of the same identity fails with `NotFound`.
    pub fn delete(&self, id: RecordId) -> CrudResult<()> {
        let name = R::descriptor().name;
        if !self.repo.exists_by_id(id)? {
            warn!("event=resource_delete module=service resource={name} status=not_found id={id}");
            return Err(CrudError::NotFound { resource: name, id });
        }

        self.repo.delete_by_id(id)?;
        info!("event=resource_delete module=service resource={name} status=ok id={id}");
        Ok(())
    }

    /// Lists records whose filter attribute equals `value` exactly.
    pub fn filter(&self, value: &str) -> CrudResult<Vec<R>> {
        let descriptor = R::descriptor();
        let records = self.repo.find_by_attribute(descriptor.filter.field, value)?;
        info!(
            "event=resource_filter module=service resource={} field={} status=ok count={}",
            descriptor.name,
            descriptor.filter.field,
            records.len()
        );
        Ok(records)
    }
}
