//! HTTP server assembly.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{self, ApiDoc};
use crate::config::Config;
use crate::db::Storage;
use crate::middleware::RequestLogger;
use crate::services;

/// Register shared state and every route on an app.
///
/// The publish endpoint is served both under `/api/v1` and the bare `/v1`
/// prefix used by existing CI pipelines.
pub fn configure(
    storage: Arc<dyn Storage>,
    max_upload_size: usize,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::new(max_upload_size))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(services::configure_publish_routes),
            )
            .service(web::scope("/v1").configure(services::configure_publish_routes));
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(config: Config, storage: Arc<dyn Storage>) -> std::io::Result<()> {
    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let worker_count = num_cpus::get();

    info!(
        "Upload limit: {}MB per report",
        max_upload_size / 1024 / 1024
    );
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );

    let routes = configure(storage, max_upload_size);
    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .configure(routes.clone())
            .service(SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", openapi.clone()))
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
