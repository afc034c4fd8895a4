//! Migration: Create features and feature_scenarios tables.
//!
//! Issue-tracker tickets and their many-to-many link to scenarios.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE features (
                    id TEXT PRIMARY KEY, -- ticket ID, e.g. DAKOTA-123
                    title TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TRIGGER update_features_updated_at
                    BEFORE UPDATE ON features
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();

                CREATE TABLE feature_scenarios (
                    feature_id TEXT NOT NULL REFERENCES features(id) ON DELETE CASCADE,
                    scenario_id UUID NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
                    PRIMARY KEY (feature_id, scenario_id)
                );

                -- Index for scenario -> features lookup
                CREATE INDEX idx_feature_scenarios_scenario_id ON feature_scenarios(scenario_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS feature_scenarios CASCADE;
                DROP TRIGGER IF EXISTS update_features_updated_at ON features;
                DROP TABLE IF EXISTS features CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
