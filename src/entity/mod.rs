//! SeaORM entity definitions for PostgreSQL database.

pub mod feature;
pub mod feature_scenario;
pub mod scenario;
pub mod scenario_result;
pub mod suite_result;
