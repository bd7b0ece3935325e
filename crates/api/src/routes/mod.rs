//! HTTP route handlers.
//!
//! Handlers only translate between HTTP and the buses: path and body in,
//! a [`Command`](domain::Command) or [`Query`](projections::Query) out.

pub mod admin;
pub mod growing_units;
pub mod health;
pub mod locations;
pub mod metrics;
pub mod plants;

use std::sync::Arc;

use common::AggregateId;
use domain::{CommandBus, CommandResult, PlantId};
use projections::{EventDispatcher, QueryBus};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub commands: CommandBus,
    pub queries: QueryBus,
    pub dispatcher: Arc<EventDispatcher>,
}

/// Body returned by every successful command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub version: i64,
}

impl From<CommandResult> for CommandResponse {
    fn from(result: CommandResult) -> Self {
        Self {
            id: result.aggregate_id.as_uuid(),
            entity_id: result.entity_id,
            version: result.version.as_i64(),
        }
    }
}

fn parse_uuid(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}

fn parse_aggregate_id(id: &str) -> Result<AggregateId, ApiError> {
    parse_uuid(id).map(AggregateId::from)
}

fn parse_plant_id(id: &str) -> Result<PlantId, ApiError> {
    parse_uuid(id).map(PlantId::from_uuid)
}
