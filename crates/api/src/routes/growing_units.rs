//! Growing unit endpoints, including the plants they hold.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{
    AddPlant, Command, CreateGrowingUnit, DeleteGrowingUnit, GrowingUnitChanges, NewPlant,
    PlantChanges, RemovePlant, UpdateGrowingUnit, UpdatePlant,
};
use projections::{Query, QueryResult};
use store::Criteria;

use super::{AppState, CommandResponse, parse_aggregate_id, parse_plant_id, parse_uuid};
use crate::error::ApiError;

/// POST /growing-units
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGrowingUnit>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let result = state.commands.execute(Command::CreateGrowingUnit(req)).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// GET /growing-units/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<QueryResult>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.queries.execute(Query::FindGrowingUnitById(id)).await?))
}

/// POST /growing-units/search
#[tracing::instrument(skip(state, criteria))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<Criteria>,
) -> Result<Json<QueryResult>, ApiError> {
    Ok(Json(
        state
            .queries
            .execute(Query::FindGrowingUnitsByCriteria(criteria))
            .await?,
    ))
}

/// PATCH /growing-units/{id}
#[tracing::instrument(skip(state, changes))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<GrowingUnitChanges>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let result = state
        .commands
        .execute(Command::UpdateGrowingUnit(UpdateGrowingUnit::new(id, changes)))
        .await?;
    Ok(Json(result.into()))
}

/// DELETE /growing-units/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let result = state
        .commands
        .execute(Command::DeleteGrowingUnit(DeleteGrowingUnit::new(id)))
        .await?;
    Ok(Json(result.into()))
}

/// POST /growing-units/{id}/plants
#[tracing::instrument(skip(state, plant))]
pub async fn add_plant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(plant): Json<NewPlant>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let id = parse_aggregate_id(&id)?;
    let result = state
        .commands
        .execute(Command::AddPlant(AddPlant::new(id, plant)))
        .await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// PATCH /growing-units/{id}/plants/{plant_id}
#[tracing::instrument(skip(state, changes))]
pub async fn update_plant(
    State(state): State<Arc<AppState>>,
    Path((id, plant_id)): Path<(String, String)>,
    Json(changes): Json<PlantChanges>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let plant_id = parse_plant_id(&plant_id)?;
    let result = state
        .commands
        .execute(Command::UpdatePlant(UpdatePlant::new(id, plant_id, changes)))
        .await?;
    Ok(Json(result.into()))
}

/// DELETE /growing-units/{id}/plants/{plant_id}
#[tracing::instrument(skip(state))]
pub async fn remove_plant(
    State(state): State<Arc<AppState>>,
    Path((id, plant_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = parse_aggregate_id(&id)?;
    let plant_id = parse_plant_id(&plant_id)?;
    let result = state
        .commands
        .execute(Command::RemovePlant(RemovePlant::new(id, plant_id)))
        .await?;
    Ok(Json(result.into()))
}
