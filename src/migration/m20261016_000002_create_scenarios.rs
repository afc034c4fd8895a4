//! Migration: Create scenarios table.
//!
//! Test case identities shared across runs.

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
                CREATE TABLE scenarios (
                    id UUID PRIMARY KEY,
                    name TEXT NOT NULL,
                    test_type VARCHAR(20) NOT NULL,
                    service TEXT NOT NULL,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Upsert target: one scenario per name within a service and test type
                CREATE UNIQUE INDEX idx_scenarios_identity
                    ON scenarios(name, test_type, service);

                CREATE TRIGGER update_scenarios_updated_at
                    BEFORE UPDATE ON scenarios
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
                DROP TRIGGER IF EXISTS update_scenarios_updated_at ON scenarios;
                DROP TABLE IF EXISTS scenarios CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
