//! SuiteResult entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suite_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub build: String,
    pub environment: String,
    pub service: String,
    pub test_type: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub coverage: Option<f64>,
    pub executed: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    #[sea_orm(column_type = "Double")]
    pub time_taken: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scenario_result::Entity")]
    ScenarioResults,
}

impl Related<super::scenario_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScenarioResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
