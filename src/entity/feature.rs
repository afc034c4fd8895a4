//! Feature entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "features")]
pub struct Model {
    /// Ticket ID, e.g. `DAKOTA-123`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub title: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feature_scenario::Entity")]
    FeatureScenarios,
}

impl Related<super::scenario::Entity> for Entity {
    fn to() -> RelationDef {
        super::feature_scenario::Relation::Scenario.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::feature_scenario::Relation::Feature.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
