//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Treco Test Report Collector",
        version = "0.1.0",
        description = "Collects JUnit test reports and stores per-run test results"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Publish endpoints
        services::publish::publish_report,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Publish
            services::ingest::IngestOutcome,
            models::ScenarioStatus,
            models::SuiteTotals,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Publish", description = "Test report ingestion")
    )
)]
pub struct ApiDoc;
