//! Business logic services.

pub mod aggregator;
pub mod classifier;
pub mod features;
pub mod ingest;
pub mod publish;
pub mod result_builder;

pub use ingest::{ingest, prepare, IngestOutcome};
pub use publish::configure_routes as configure_publish_routes;
