//! Generic CRUD handlers, instantiated once per resource type.
//!
//! Each handler parses the request, hands a typed command to
//! `CrudService` on the blocking pool and maps the outcome to a response.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinica_core::model::{record_from_fields, ID_FIELD};
use clinica_core::{
    validate_fields, CrudService, RecordId, Resource, SqliteResourceRepository,
};
use log::{info, warn};
use rusqlite::Connection;
use serde_json::Value;

fn service<R: Resource>(conn: &Connection) -> CrudService<R, SqliteResourceRepository<'_, R>> {
    CrudService::new(SqliteResourceRepository::new(conn))
}

/// `GET {prefix}`
pub async fn list<R: Resource>(State(state): State<AppState>) -> Result<Json<Vec<R>>, ApiError> {
    let records = state
        .with_connection(|conn| service::<R>(conn).list())
        .await?;
    Ok(Json(records))
}

/// `GET {prefix}[/id]/{id}`
pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let id = parse_id(&raw_id)?;
    let record = state
        .with_connection(move |conn| service::<R>(conn).get(id))
        .await?;
    Ok(Json(record))
}

/// `POST {prefix}`
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let record = parse_body::<R>(&body)?;
    let created = state
        .with_connection(move |conn| service::<R>(conn).create(record))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT {prefix}[/id]/{id}`; an identity inside the body is ignored.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<R>, ApiError> {
    let id = parse_id(&raw_id)?;
    let record = parse_body::<R>(&body)?;
    let updated = state
        .with_connection(move |conn| service::<R>(conn).update(id, record))
        .await?;
    Ok(Json(updated))
}

/// `DELETE {prefix}[/id]/{id}`
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .with_connection(move |conn| service::<R>(conn).delete(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET {prefix}/{segment}/{value}`; 204 when nothing matches.
pub async fn filter<R: Resource>(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Response, ApiError> {
    let descriptor = R::descriptor();
    let records = state
        .with_connection(move |conn| service::<R>(conn).filter(&value))
        .await?;

    if records.is_empty() {
        info!(
            "event=resource_filter module=http resource={} field={} status=empty",
            descriptor.name, descriptor.filter.field
        );
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(records).into_response())
}

/// Accepts only plain ASCII digits; signs and whitespace are rejected.
fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    Some(raw)
        .filter(|raw| !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()))
        .and_then(|raw| raw.parse::<RecordId>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ApiError::BadRequest(format!("invalid identity `{raw}`: expected a positive integer"))
        })
}

/// Parses a JSON object body, validates it and builds the typed record.
fn parse_body<R: Resource>(body: &[u8]) -> Result<R, ApiError> {
    let descriptor = R::descriptor();
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("malformed JSON body: {err}")))?;
    let Value::Object(mut fields) = value else {
        return Err(ApiError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    if let Err(errors) = validate_fields(descriptor, &fields) {
        warn!(
            "event=request_validation module=http resource={} status=rejected fields={}",
            descriptor.name,
            errors.fields().keys().cloned().collect::<Vec<_>>().join(",")
        );
        return Err(ApiError::Validation(errors));
    }

    fields.remove(ID_FIELD);
    record_from_fields(fields).map_err(|err| {
        ApiError::BadRequest(format!("invalid {} body: {err}", descriptor.name))
    })
}
