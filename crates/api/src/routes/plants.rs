//! Plant read endpoints and transplanting.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::AggregateId;
use domain::{Command, TransplantPlant};
use projections::{Query, QueryResult};
use serde::Deserialize;
use store::Criteria;

use super::{AppState, CommandResponse, parse_plant_id, parse_uuid};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransplantRequest {
    pub source_growing_unit_id: AggregateId,
    pub target_growing_unit_id: AggregateId,
}

/// GET /plants/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<QueryResult>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.queries.execute(Query::FindPlantById(id)).await?))
}

/// POST /plants/search
#[tracing::instrument(skip(state, criteria))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<Criteria>,
) -> Result<Json<QueryResult>, ApiError> {
    Ok(Json(
        state.queries.execute(Query::FindPlantsByCriteria(criteria)).await?,
    ))
}

/// POST /plants/{id}/transplant
#[tracing::instrument(skip(state, req))]
pub async fn transplant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TransplantRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let plant_id = parse_plant_id(&id)?;
    let result = state
        .commands
        .execute(Command::TransplantPlant(TransplantPlant::new(
            plant_id,
            req.source_growing_unit_id,
            req.target_growing_unit_id,
        )))
        .await?;
    Ok(Json(result.into()))
}
