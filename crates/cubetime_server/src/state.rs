//! Shared handler state.
//!
//! One SQLite connection serves every request; each use runs on a tokio
//! blocking worker.

use std::sync::{Arc, Mutex, PoisonError};

use log::warn;
use rusqlite::Connection;

use crate::error::ApiError;

/// Shared handler state: the single SQLite connection.
pub struct AppState {
    db: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Arc<Self> {
        Arc::new(Self {
            db: Mutex::new(conn),
        })
    }

    /// Runs `work` against the connection on a blocking worker thread.
    ///
    /// A lock poisoned by a panicking request is recovered and logged; any
    /// transaction that request held was rolled back while unwinding.
    pub async fn with_conn<T, F>(self: &Arc<Self>, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, ApiError> + Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut conn = state.db.lock().unwrap_or_else(|poisoned| {
                warn!("event=db_lock module=api status=error error_code=mutex_poisoned recovered=true");
                state.db.clear_poison();
                PoisonError::into_inner(poisoned)
            });
            work(&mut *conn)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("database task failed: {err}")))?
    }
}
