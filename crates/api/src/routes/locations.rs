//! Location endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{Command, CreateLocation, DeleteLocation, LocationChanges, UpdateLocation};
use projections::{Query, QueryResult};
use store::Criteria;

use super::{AppState, CommandResponse, parse_aggregate_id, parse_uuid};
use crate::error::ApiError;

/// POST /locations
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLocation>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let result = state.commands.execute(Command::CreateLocation(req)).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// GET /locations/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<QueryResult>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.queries.execute(Query::FindLocationById(id)).await?))
}

/// POST /locations/search
#[tracing::instrument(skip(state, criteria))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<Criteria>,
) -> Result<Json<QueryResult>, ApiError> {
    Ok(Json(
        state.queries.execute(Query::FindLocationsByCriteria(criteria)).await?,
    ))
}

/// PATCH /locations/{id}
#[tracing::instrument(skip(state, changes))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<LocationChanges>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let result = state
        .commands
        .execute(Command::UpdateLocation(UpdateLocation::new(id, changes)))
        .await?;
    Ok(Json(result.into()))
}

/// DELETE /locations/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let result = state
        .commands
        .execute(Command::DeleteLocation(DeleteLocation::new(id)))
        .await?;
    Ok(Json(result.into()))
}
