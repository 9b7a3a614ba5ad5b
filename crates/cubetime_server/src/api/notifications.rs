//! Threshold notification endpoints.
//!
//! Each request classifies the full group set; nothing is cached.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use cubetime_core::{Notification, NotificationService, SqliteGroupRepository};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Scope {
    Delayed,
    Early,
    All,
}

pub async fn delayed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    classify(&state, Scope::Delayed).await
}

pub async fn early(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    classify(&state, Scope::Early).await
}

pub async fn notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    classify(&state, Scope::All).await
}

async fn classify(
    state: &Arc<AppState>,
    scope: Scope,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let result = state
        .with_conn(move |conn| {
            let service = NotificationService::new(SqliteGroupRepository::try_new(conn)?);
            let notifications = match scope {
                Scope::Delayed => service.delayed()?,
                Scope::Early => service.early()?,
                Scope::All => service.notifications()?,
            };
            Ok(notifications)
        })
        .await?;
    Ok(Json(result))
}
