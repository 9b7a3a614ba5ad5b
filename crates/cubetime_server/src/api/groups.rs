//! Group create, lookup and history endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cubetime_core::{
    Group, GroupAnalysis, GroupId, GroupService, GroupTime, SqliteGroupRepository,
};

use crate::error::ApiError;
use crate::payload::parse_new_group;
use crate::state::AppState;

pub async fn list_groups(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = state
        .with_conn(|conn| {
            let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.list_recent_groups(None)?)
        })
        .await?;
    Ok(Json(groups))
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let input = parse_new_group(&body).map_err(ApiError::Validation)?;

    let group = state
        .with_conn(move |conn| {
            let mut service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.create_group(&input)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_group_id(&id)?;
    let group = state
        .with_conn(move |conn| {
            let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.get_group(id)?)
        })
        .await?;
    Ok(Json(group))
}

pub async fn analyze_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GroupAnalysis>, ApiError> {
    let id = parse_group_id(&id)?;
    let analysis = state
        .with_conn(move |conn| {
            let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.analyze_group(id)?)
        })
        .await?;
    Ok(Json(analysis))
}

pub async fn latest_group_times(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GroupTime>>, ApiError> {
    let times = state
        .with_conn(|conn| {
            let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.latest_group_times(None)?)
        })
        .await?;
    Ok(Json(times))
}

/// Ids that are not integers cannot exist, so they are reported as missing.
fn parse_group_id(raw: &str) -> Result<GroupId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound("Group"))
}
