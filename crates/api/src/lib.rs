//! HTTP API server with observability for the growing-unit backend.
//!
//! Provides REST endpoints for locations, growing units and plants, plus
//! dead-letter administration, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use domain::{CommandBus, CommandContext, GrowingUnit, Location};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{
    DEFAULT_DEAD_LETTER_CAPACITY, EventDispatcher, QueryBus, ViewStores, register_projectors,
};
use store::{InMemoryWriteRepository, WriteRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/locations", post(routes::locations::create))
        .route("/locations/search", post(routes::locations::search))
        .route(
            "/locations/{id}",
            get(routes::locations::get)
                .patch(routes::locations::update)
                .delete(routes::locations::delete),
        )
        .route("/growing-units", post(routes::growing_units::create))
        .route("/growing-units/search", post(routes::growing_units::search))
        .route(
            "/growing-units/{id}",
            get(routes::growing_units::get)
                .patch(routes::growing_units::update)
                .delete(routes::growing_units::delete),
        )
        .route(
            "/growing-units/{id}/plants",
            post(routes::growing_units::add_plant),
        )
        .route(
            "/growing-units/{id}/plants/{plant_id}",
            patch(routes::growing_units::update_plant).delete(routes::growing_units::remove_plant),
        )
        .route("/plants/search", post(routes::plants::search))
        .route("/plants/{id}", get(routes::plants::get))
        .route("/plants/{id}/transplant", post(routes::plants::transplant))
        .route(
            "/admin/dead-letters",
            get(routes::admin::dead_letters).delete(routes::admin::purge),
        )
        .route(
            "/admin/dead-letters/redeliver",
            post(routes::admin::redeliver),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the in-memory stores, projectors and buses together.
///
/// The dispatcher is the event bus the command handlers publish to, so every
/// successful command has updated the read store before it returns.
pub fn create_default_state() -> Arc<AppState> {
    create_state(DEFAULT_DEAD_LETTER_CAPACITY)
}

/// Same wiring, with a dead-letter log bounded at `dead_letter_capacity`.
pub fn create_state(dead_letter_capacity: usize) -> Arc<AppState> {
    let locations: Arc<dyn WriteRepository<Location>> =
        Arc::new(InMemoryWriteRepository::<Location>::new());
    let growing_units: Arc<dyn WriteRepository<GrowingUnit>> =
        Arc::new(InMemoryWriteRepository::<GrowingUnit>::new());
    let views = ViewStores::in_memory();

    let mut dispatcher = EventDispatcher::with_dead_letter_capacity(dead_letter_capacity);
    register_projectors(
        &mut dispatcher,
        Arc::clone(&locations),
        Arc::clone(&growing_units),
        &views,
    );
    let dispatcher = Arc::new(dispatcher);

    let ctx = CommandContext::new(locations, growing_units, dispatcher.clone());

    Arc::new(AppState {
        commands: CommandBus::new(&ctx),
        queries: QueryBus::new(&views),
        dispatcher,
    })
}
