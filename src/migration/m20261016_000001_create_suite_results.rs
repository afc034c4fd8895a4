//! Migration: Create suite_results table.
//!
//! One row per ingestion run with the totals of the uploaded report.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TABLE suite_results (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting

                    -- Run parameters
                    build TEXT NOT NULL,
                    environment TEXT NOT NULL,
                    service TEXT NOT NULL,   -- lower-cased
                    test_type VARCHAR(20) NOT NULL
                        CHECK (test_type IN ('unit', 'contract', 'integration', 'e2e')),
                    coverage DOUBLE PRECISION,

                    -- Totals
                    executed BIGINT NOT NULL DEFAULT 0,
                    passed BIGINT NOT NULL DEFAULT 0,
                    failed BIGINT NOT NULL DEFAULT 0,
                    skipped BIGINT NOT NULL DEFAULT 0,
                    time_taken DOUBLE PRECISION NOT NULL DEFAULT 0, -- seconds

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-service history
                CREATE INDEX idx_suite_results_service ON suite_results(service, test_type);

                -- Index for build lookup
                CREATE INDEX idx_suite_results_build ON suite_results(build);

                CREATE TRIGGER update_suite_results_updated_at
                    BEFORE UPDATE ON suite_results
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
                DROP TRIGGER IF EXISTS update_suite_results_updated_at ON suite_results;
                DROP TABLE IF EXISTS suite_results CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
