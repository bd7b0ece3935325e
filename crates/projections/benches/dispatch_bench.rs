use std::sync::Arc;

use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AddPlant, Command, CommandBus, CommandContext, CreateGrowingUnit, CreateLocation, GrowingUnit,
    GrowingUnitType, Location, LocationType, NewPlant,
};
use projections::{EventDispatcher, Query, QueryBus, ViewStores, register_projectors};
use store::{Criteria, FilterOperator, InMemoryWriteRepository, SortDirection};

fn setup() -> (CommandBus, QueryBus) {
    let locations = Arc::new(InMemoryWriteRepository::<Location>::new());
    let growing_units = Arc::new(InMemoryWriteRepository::<GrowingUnit>::new());
    let views = ViewStores::in_memory();

    let mut dispatcher = EventDispatcher::new();
    register_projectors(&mut dispatcher, locations.clone(), growing_units.clone(), &views);

    let ctx = CommandContext::new(locations, growing_units, Arc::new(dispatcher));
    (CommandBus::new(&ctx), QueryBus::new(&views))
}

async fn populate(commands: &CommandBus, units: usize, plants_per_unit: usize) -> AggregateId {
    let location_id = commands
        .execute(Command::CreateLocation(CreateLocation::new("Bench", LocationType::Greenhouse)))
        .await
        .unwrap()
        .aggregate_id;

    for u in 0..units {
        let unit_id = commands
            .execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
                location_id,
                format!("Unit {u}"),
                GrowingUnitType::GardenBed,
                plants_per_unit as u32,
            )))
            .await
            .unwrap()
            .aggregate_id;
        for p in 0..plants_per_unit {
            commands
                .execute(Command::AddPlant(AddPlant::new(
                    unit_id,
                    NewPlant::new(format!("Plant {u}-{p}")),
                )))
                .await
                .unwrap();
        }
    }
    location_id
}

fn bench_command_through_projectors(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("dispatch/create_unit_with_5_plants", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (commands, _) = setup();
                populate(&commands, 1, 5).await;
            });
        });
    });
}

fn bench_plant_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (commands, queries) = setup();
    rt.block_on(populate(&commands, 50, 10));

    let criteria = Criteria::new()
        .filter("name", FilterOperator::Like, "plant 1%")
        .sort("name", SortDirection::Asc)
        .paginate(2, 20);

    c.bench_function("dispatch/search_500_plant_views", |b| {
        b.iter(|| {
            rt.block_on(async {
                queries
                    .execute(Query::FindPlantsByCriteria(criteria.clone()))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_command_through_projectors, bench_plant_search);
criterion_main!(benches);
