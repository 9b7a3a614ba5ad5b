//! Color average and store-wide summary endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use cubetime_core::{
    ColorAverage, GroupService, GroupSummary, SqliteCubeRepository, SqliteGroupRepository,
    StatsService,
};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn average_by_color(
    State(state): State<Arc<AppState>>,
    Path(color): Path<String>,
) -> Result<Json<ColorAverage>, ApiError> {
    let average = state
        .with_conn(move |conn| {
            let service = StatsService::new(SqliteCubeRepository::try_new(conn)?);
            Ok(service.average_by_color(&color)?)
        })
        .await?;
    Ok(Json(average))
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<GroupSummary>, ApiError> {
    let summary = state
        .with_conn(|conn| {
            let service = GroupService::new(SqliteGroupRepository::try_new(conn)?);
            Ok(service.summary()?)
        })
        .await?;
    Ok(Json(summary))
}
