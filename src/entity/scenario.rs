//! Scenario entity for SeaORM.
//!
//! One row per distinct (name, test_type, service).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scenarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub test_type: String,
    pub service: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scenario_result::Entity")]
    ScenarioResults,
    #[sea_orm(has_many = "super::feature_scenario::Entity")]
    FeatureScenarios,
}

impl Related<super::scenario_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScenarioResults.def()
    }
}

impl Related<super::feature::Entity> for Entity {
    fn to() -> RelationDef {
        super::feature_scenario::Relation::Feature.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::feature_scenario::Relation::Scenario.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
