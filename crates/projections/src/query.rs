//! Query handlers and the typed query bus.
//!
//! Queries are answered from the read store only; they never touch the
//! write side.

use std::sync::Arc;

use serde::Serialize;
use store::{
    AssertViewExists, Criteria, InMemoryReadRepository, PaginatedResult, ReadRepository, ViewModel,
};
use uuid::Uuid;

use crate::views::{GrowingUnitViewModel, LocationViewModel, PlantViewModel};

/// The three read stores, shared by projectors and query handlers.
#[derive(Clone)]
pub struct ViewStores {
    pub locations: Arc<dyn ReadRepository<LocationViewModel>>,
    pub growing_units: Arc<dyn ReadRepository<GrowingUnitViewModel>>,
    pub plants: Arc<dyn ReadRepository<PlantViewModel>>,
}

impl ViewStores {
    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            locations: Arc::new(InMemoryReadRepository::<LocationViewModel>::new()),
            growing_units: Arc::new(InMemoryReadRepository::<GrowingUnitViewModel>::new()),
            plants: Arc::new(InMemoryReadRepository::<PlantViewModel>::new()),
        }
    }
}

/// Loads one view by id, failing with `NotFound` when absent.
pub struct FindViewByIdHandler<V: ViewModel> {
    views: Arc<dyn ReadRepository<V>>,
}

impl<V: ViewModel> FindViewByIdHandler<V> {
    pub fn new(views: Arc<dyn ReadRepository<V>>) -> Self {
        Self { views }
    }

    #[tracing::instrument(skip(self), fields(kind = V::KIND))]
    pub async fn execute(&self, id: Uuid) -> store::Result<V> {
        AssertViewExists::new(self.views.as_ref()).execute(id).await
    }
}

/// Searches views with a [`Criteria`].
pub struct FindViewsByCriteriaHandler<V: ViewModel> {
    views: Arc<dyn ReadRepository<V>>,
}

impl<V: ViewModel> FindViewsByCriteriaHandler<V> {
    pub fn new(views: Arc<dyn ReadRepository<V>>) -> Self {
        Self { views }
    }

    #[tracing::instrument(skip(self, criteria), fields(kind = V::KIND, filters = criteria.filters.len()))]
    pub async fn execute(&self, criteria: &Criteria) -> store::Result<PaginatedResult<V>> {
        self.views.find_by_criteria(criteria).await
    }
}

pub type FindLocationByIdHandler = FindViewByIdHandler<LocationViewModel>;
pub type FindLocationsByCriteriaHandler = FindViewsByCriteriaHandler<LocationViewModel>;
pub type FindGrowingUnitByIdHandler = FindViewByIdHandler<GrowingUnitViewModel>;
pub type FindGrowingUnitsByCriteriaHandler = FindViewsByCriteriaHandler<GrowingUnitViewModel>;
pub type FindPlantByIdHandler = FindViewByIdHandler<PlantViewModel>;
pub type FindPlantsByCriteriaHandler = FindViewsByCriteriaHandler<PlantViewModel>;

/// Every query the read side answers.
#[derive(Debug, Clone)]
pub enum Query {
    FindLocationById(Uuid),
    FindLocationsByCriteria(Criteria),
    FindGrowingUnitById(Uuid),
    FindGrowingUnitsByCriteria(Criteria),
    FindPlantById(Uuid),
    FindPlantsByCriteria(Criteria),
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Query::FindLocationById(_) => "FindLocationById",
            Query::FindLocationsByCriteria(_) => "FindLocationsByCriteria",
            Query::FindGrowingUnitById(_) => "FindGrowingUnitById",
            Query::FindGrowingUnitsByCriteria(_) => "FindGrowingUnitsByCriteria",
            Query::FindPlantById(_) => "FindPlantById",
            Query::FindPlantsByCriteria(_) => "FindPlantsByCriteria",
        }
    }
}

/// Result of a [`Query`]; serializes as the bare view or page.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Location(LocationViewModel),
    Locations(PaginatedResult<LocationViewModel>),
    GrowingUnit(GrowingUnitViewModel),
    GrowingUnits(PaginatedResult<GrowingUnitViewModel>),
    Plant(PlantViewModel),
    Plants(PaginatedResult<PlantViewModel>),
}

/// Routes each [`Query`] to its handler.
pub struct QueryBus {
    location_by_id: FindLocationByIdHandler,
    locations_by_criteria: FindLocationsByCriteriaHandler,
    growing_unit_by_id: FindGrowingUnitByIdHandler,
    growing_units_by_criteria: FindGrowingUnitsByCriteriaHandler,
    plant_by_id: FindPlantByIdHandler,
    plants_by_criteria: FindPlantsByCriteriaHandler,
}

impl QueryBus {
    pub fn new(stores: &ViewStores) -> Self {
        Self {
            location_by_id: FindViewByIdHandler::new(Arc::clone(&stores.locations)),
            locations_by_criteria: FindViewsByCriteriaHandler::new(Arc::clone(&stores.locations)),
            growing_unit_by_id: FindViewByIdHandler::new(Arc::clone(&stores.growing_units)),
            growing_units_by_criteria: FindViewsByCriteriaHandler::new(Arc::clone(
                &stores.growing_units,
            )),
            plant_by_id: FindViewByIdHandler::new(Arc::clone(&stores.plants)),
            plants_by_criteria: FindViewsByCriteriaHandler::new(Arc::clone(&stores.plants)),
        }
    }

    pub async fn execute(&self, query: Query) -> store::Result<QueryResult> {
        let name = query.name();
        let result = match query {
            Query::FindLocationById(id) => {
                self.location_by_id.execute(id).await.map(QueryResult::Location)
            }
            Query::FindLocationsByCriteria(criteria) => self
                .locations_by_criteria
                .execute(&criteria)
                .await
                .map(QueryResult::Locations),
            Query::FindGrowingUnitById(id) => self
                .growing_unit_by_id
                .execute(id)
                .await
                .map(QueryResult::GrowingUnit),
            Query::FindGrowingUnitsByCriteria(criteria) => self
                .growing_units_by_criteria
                .execute(&criteria)
                .await
                .map(QueryResult::GrowingUnits),
            Query::FindPlantById(id) => self.plant_by_id.execute(id).await.map(QueryResult::Plant),
            Query::FindPlantsByCriteria(criteria) => self
                .plants_by_criteria
                .execute(&criteria)
                .await
                .map(QueryResult::Plants),
        };

        metrics::counter!("queries_executed_total", "query" => name).increment(1);
        result
    }
}
