//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20261016_000001_create_suite_results;
mod m20261016_000002_create_scenarios;
mod m20261016_000003_create_features;
mod m20261016_000004_create_scenario_results;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_suite_results::Migration),
            Box::new(m20261016_000002_create_scenarios::Migration),
            Box::new(m20261016_000003_create_features::Migration),
            Box::new(m20261016_000004_create_scenario_results::Migration),
        ]
    }
}
