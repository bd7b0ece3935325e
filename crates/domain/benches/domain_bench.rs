use std::sync::Arc;

use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AddPlant, Command, CommandBus, CommandContext, CreateGrowingUnit, CreateLocation, GrowingUnit,
    GrowingUnitType, Location, LocationType, NewPlant, RecordingEventBus, RemovePlant, PlantId,
};
use store::InMemoryWriteRepository;

fn command_bus() -> CommandBus {
    let ctx = CommandContext::new(
        Arc::new(InMemoryWriteRepository::<Location>::new()),
        Arc::new(InMemoryWriteRepository::<GrowingUnit>::new()),
        Arc::new(RecordingEventBus::new()),
    );
    CommandBus::new(&ctx)
}

async fn setup_unit(bus: &CommandBus) -> AggregateId {
    let location_id = bus
        .execute(Command::CreateLocation(CreateLocation::new(
            "Bench",
            LocationType::Room,
        )))
        .await
        .unwrap()
        .aggregate_id;
    bus.execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
        location_id,
        "Bench pot",
        GrowingUnitType::Pot,
        10,
    )))
    .await
    .unwrap()
    .aggregate_id
}

fn bench_create_location(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let bus = command_bus();

    c.bench_function("domain/create_location", |b| {
        b.iter(|| {
            rt.block_on(async {
                bus.execute(Command::CreateLocation(CreateLocation::new(
                    "Kitchen",
                    LocationType::Room,
                )))
                .await
                .unwrap();
            });
        });
    });
}

fn bench_add_and_remove_plant(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let bus = command_bus();
    let unit_id = rt.block_on(setup_unit(&bus));

    c.bench_function("domain/add_and_remove_plant", |b| {
        b.iter(|| {
            rt.block_on(async {
                let result = bus
                    .execute(Command::AddPlant(AddPlant::new(unit_id, NewPlant::new("Basil"))))
                    .await
                    .unwrap();
                bus.execute(Command::RemovePlant(RemovePlant::new(
                    unit_id,
                    PlantId::from_uuid(result.entity_id),
                )))
                .await
                .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_create_location, bench_add_and_remove_plant);
criterion_main!(benches);
