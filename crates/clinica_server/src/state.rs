//! Shared application state handed to every handler.

use crate::error::ApiError;
use clinica_core::CrudResult;
use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Owns the single SQLite connection shared by all requests.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an opened, fully migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one store operation on the blocking pool.
    ///
    /// The connection lock is held for the whole operation, so each pipeline
    /// run observes a consistent store.
    pub async fn with_connection<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> CrudResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db.lock().map_err(|_| {
                error!("event=db_lock module=http status=error error_code=lock_poisoned");
                ApiError::Internal("database connection lock poisoned".to_string())
            })?;
            op(&*conn).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
