//! Generic resource repository over descriptor-declared tables.
//!
//! # Responsibility
//! - Provide list/find/filter/insert/upsert/delete/exists over one table.
//! - Derive every SQL statement from the resource descriptor.
//!
//! # Invariants
//! - Identity is generated by SQLite on insert and never written by callers
//!   except through `upsert` of an already-identified record.
//! - Read paths reject rows that violate declared constraints instead of
//!   masking them.
//! - Table and column names come only from static descriptors; caller
//!   values are always bound as parameters.

use crate::db::DbError;
use crate::model::descriptor::{
    record_to_fields, FieldRule, RecordId, Resource, ResourceDescriptor, ID_FIELD,
};
use crate::validation::{validate_fields, validate_record, ValidationErrors};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Params, Row};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for resource persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationErrors),
    Db(DbError),
    NotFound {
        resource: &'static str,
        id: RecordId,
    },
    /// The store's unique index on the duplicate key rejected a write.
    Duplicate {
        resource: &'static str,
        fields: &'static [&'static str],
    },
    UnknownField {
        resource: &'static str,
        field: String,
    },
    MissingId(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Duplicate { resource, fields } => write!(
                f,
                "{resource} with the same {} already exists",
                fields.join(", ")
            ),
            Self::UnknownField { resource, field } => {
                write!(f, "{resource} has no field `{field}`")
            }
            Self::MissingId(resource) => write!(f, "{resource} record has no identity"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Persistence port for one resource type.
pub trait ResourceRepository<R: Resource> {
    /// Returns every persisted record ordered by identity.
    fn list_all(&self) -> RepoResult<Vec<R>>;
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<R>>;
    /// Exact, case-sensitive match on one declared field.
    fn find_by_attribute(&self, field: &str, value: &str) -> RepoResult<Vec<R>>;
    /// Inserts a new row and returns the record with its assigned identity.
    fn insert(&self, record: &R) -> RepoResult<R>;
    /// Writes an identified record, inserting the row if it is absent.
    fn upsert(&self, record: &R) -> RepoResult<R>;
    fn delete_by_id(&self, id: RecordId) -> RepoResult<()>;
    fn exists_by_id(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed repository for any descriptor-declared resource.
pub struct SqliteResourceRepository<'conn, R> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> R>,
}

impl<'conn, R: Resource> SqliteResourceRepository<'conn, R> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    fn descriptor(&self) -> &'static ResourceDescriptor {
        R::descriptor()
    }

    fn select_sql(&self) -> String {
        let descriptor = self.descriptor();
        format!(
            "SELECT {ID_FIELD}, {} FROM {}",
            column_list(descriptor),
            descriptor.table
        )
    }

    fn query_records<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<R>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(self.descriptor(), row)?);
        }

        Ok(records)
    }

    fn execute_write<P: Params>(&self, sql: &str, params: P) -> RepoResult<usize> {
        let descriptor = self.descriptor();
        self.conn.execute(sql, params).map_err(|err| {
            let err = DbError::Sqlite(err);
            if err.is_unique_violation() {
                RepoError::Duplicate {
                    resource: descriptor.name,
                    fields: descriptor.duplicate_key,
                }
            } else {
                RepoError::Db(err)
            }
        })
    }
}

impl<R: Resource> ResourceRepository<R> for SqliteResourceRepository<'_, R> {
    fn list_all(&self) -> RepoResult<Vec<R>> {
        let sql = format!("{} ORDER BY {ID_FIELD} ASC;", self.select_sql());
        self.query_records(&sql, [])
    }

    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<R>> {
        let sql = format!("{} WHERE {ID_FIELD} = ?1;", self.select_sql());
        Ok(self.query_records(&sql, params![id])?.into_iter().next())
    }

    fn find_by_attribute(&self, field: &str, value: &str) -> RepoResult<Vec<R>> {
        let descriptor = self.descriptor();
        let spec = descriptor
            .field(field)
            .ok_or_else(|| RepoError::UnknownField {
                resource: descriptor.name,
                field: field.to_string(),
            })?;

        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY {ID_FIELD} ASC;",
            self.select_sql(),
            spec.column
        );
        self.query_records(&sql, params![value])
    }

    fn insert(&self, record: &R) -> RepoResult<R> {
        validate_record(record)?;
        let descriptor = self.descriptor();
        let values = column_values(record)?;

        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            descriptor.table,
            column_list(descriptor)
        );
        self.execute_write(&sql, params_from_iter(values))?;

        let mut stored = record.clone();
        stored.set_id(Some(self.conn.last_insert_rowid()));
        Ok(stored)
    }

    fn upsert(&self, record: &R) -> RepoResult<R> {
        let descriptor = self.descriptor();
        let id = record.id().ok_or(RepoError::MissingId(descriptor.name))?;
        validate_record(record)?;

        let mut values = vec![SqlValue::Integer(id)];
        values.extend(column_values(record)?);

        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = descriptor
            .fields
            .iter()
            .map(|spec| format!("{0} = excluded.{0}", spec.column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({ID_FIELD}, {}) VALUES ({placeholders})
             ON CONFLICT({ID_FIELD}) DO UPDATE SET {assignments};",
            descriptor.table,
            column_list(descriptor)
        );
        self.execute_write(&sql, params_from_iter(values))?;

        Ok(record.clone())
    }

    fn delete_by_id(&self, id: RecordId) -> RepoResult<()> {
        let descriptor = self.descriptor();
        let changed = self.execute_write(
            &format!("DELETE FROM {} WHERE {ID_FIELD} = ?1;", descriptor.table),
            params![id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: descriptor.name,
                id,
            });
        }

        Ok(())
    }

    fn exists_by_id(&self, id: RecordId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {ID_FIELD} = ?1);",
                self.descriptor().table
            ),
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn column_list(descriptor: &ResourceDescriptor) -> String {
    descriptor
        .fields
        .iter()
        .map(|spec| spec.column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_values<R: Resource>(record: &R) -> RepoResult<Vec<SqlValue>> {
    let descriptor = R::descriptor();
    let fields = record_to_fields(record)?;

    descriptor
        .fields
        .iter()
        .map(|spec| match fields.get(spec.name) {
            Some(Value::String(text)) => Ok(SqlValue::Text(text.clone())),
            Some(Value::Number(number)) => number.as_i64().map(SqlValue::Integer).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "{}.{} is not an integer: {number}",
                    descriptor.name, spec.name
                ))
            }),
            other => Err(RepoError::InvalidData(format!(
                "{}.{} cannot be stored: {other:?}",
                descriptor.name, spec.name
            ))),
        })
        .collect()
}

fn parse_record_row<R: Resource>(descriptor: &ResourceDescriptor, row: &Row<'_>) -> RepoResult<R> {
    let mut fields = Map::new();
    fields.insert(
        ID_FIELD.to_string(),
        Value::from(row.get::<_, RecordId>(ID_FIELD)?),
    );

    for spec in descriptor.fields {
        let value = match spec.rule {
            FieldRule::Text { .. } => Value::from(row.get::<_, String>(spec.column)?),
            FieldRule::Integer { .. } => Value::from(row.get::<_, i64>(spec.column)?),
        };
        fields.insert(spec.name.to_string(), value);
    }

    validate_fields(descriptor, &fields).map_err(|err| {
        RepoError::InvalidData(format!(
            "{} row in {}: {err}",
            descriptor.name, descriptor.table
        ))
    })?;
    Ok(serde_json::from_value(Value::Object(fields))?)
}
