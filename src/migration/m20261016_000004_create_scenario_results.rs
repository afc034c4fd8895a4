//! Migration: Create scenario_results table.
//!
//! Per-run outcome of each scenario.

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
                CREATE TABLE scenario_results (
                    id UUID PRIMARY KEY,
                    suite_result_id UUID NOT NULL REFERENCES suite_results(id) ON DELETE CASCADE,
                    scenario_id UUID NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,

                    name TEXT NOT NULL,
                    classname TEXT,

                    status VARCHAR(20) NOT NULL
                        CHECK (status IN ('passed', 'failed', 'skipped')),
                    time_taken DOUBLE PRECISION NOT NULL DEFAULT 0, -- seconds

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for suite lookup
                CREATE INDEX idx_scenario_results_suite_result_id
                    ON scenario_results(suite_result_id);

                -- Index for scenario history
                CREATE INDEX idx_scenario_results_scenario_id
                    ON scenario_results(scenario_id, status);

                CREATE TRIGGER update_scenario_results_updated_at
                    BEFORE UPDATE ON scenario_results
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
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
                DROP TRIGGER IF EXISTS update_scenario_results_updated_at ON scenario_results;
                DROP TABLE IF EXISTS scenario_results CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
