//! Report publishing endpoint.
//!
//! - `POST /api/v1/publish/report` (also served at `/v1/publish/report`)
//!
//! The request is `multipart/form-data` carrying the run parameters as text
//! fields named after the lower-cased environment variables (`ci_job_id`,
//! `environment`, `jira_project`, `report_format`, `service_name`,
//! `test_type`, optional `coverage`) and the report itself in `report_file`.

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::db::Storage;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::run_params::names;
use crate::models::RawRunParams;
use crate::services::ingest::{self, IngestOutcome};

const EXPECTED_CONTENT_TYPE: &str = "multipart/form-data";

/// Text fields are short; anything larger is not a run parameter.
const MAX_FIELD_SIZE: usize = 4 * 1024;

/// Form field carrying the report.
fn report_field() -> String {
    names::REPORT_FILE.to_lowercase()
}

/// Configure publish routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/publish/report")
            .route(web::post().to(publish_report))
            .default_service(web::route().to(method_not_allowed)),
    );
}

async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// Publish a test report.
///
/// Decodes the uploaded report, aggregates its results and saves them.
#[utoipa::path(
    post,
    path = "/api/v1/publish/report",
    tag = "Publish",
    request_body(content_type = "multipart/form-data", description = "Run parameters and the report_file"),
    responses(
        (status = 200, description = "Report saved", body = IngestOutcome),
        (status = 400, description = "Invalid request or malformed report", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "Report exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn publish_report(
    req: HttpRequest,
    payload: web::Payload,
    storage: web::Data<dyn Storage>,
    max_upload_size: web::Data<usize>,
) -> AppResult<HttpResponse> {
    validate_content_type(&req)?;

    let mut multipart = Multipart::new(req.headers(), payload);
    let form = read_form(&mut multipart, *max_upload_size.get_ref()).await?;

    let params = form.params.validate()?;
    let report = form
        .report
        .ok_or_else(|| AppError::InvalidInput("unable to retrieve report file".to_string()))?;

    info!(
        "Publishing {} report ({} bytes) for service {}",
        params.report_format,
        report.len(),
        params.service
    );

    let outcome = ingest::ingest(storage.get_ref(), &params, report.as_slice()).await?;

    info!("results uploaded successfully");
    Ok(HttpResponse::Ok().json(outcome))
}

fn validate_content_type(req: &HttpRequest) -> AppResult<()> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.contains(EXPECTED_CONTENT_TYPE) {
        return Err(AppError::InvalidInput(format!(
            "invalid content-type, expected: {}",
            EXPECTED_CONTENT_TYPE
        )));
    }
    Ok(())
}

/// Parsed publish form.
#[derive(Debug, Default)]
struct PublishForm {
    params: RawRunParams,
    report: Option<Vec<u8>>,
}

/// Read every field of the form, buffering the report up to `max_upload_size`.
async fn read_form(payload: &mut Multipart, max_upload_size: usize) -> AppResult<PublishForm> {
    let mut form = PublishForm::default();
    let report_field = report_field();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let name = match field.content_disposition().and_then(|cd| cd.get_name()) {
            Some(name) => name.to_lowercase(),
            None => {
                drain_field(&mut field).await;
                continue;
            }
        };

        if name == report_field {
            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
                if data.len() + chunk.len() > max_upload_size {
                    warn!("Report rejected: exceeds {} bytes", max_upload_size);
                    return Err(AppError::PayloadTooLarge(format!(
                        "report file exceeds upload limit of {} bytes",
                        max_upload_size
                    )));
                }
                data.extend_from_slice(&chunk);
            }
            form.report = Some(data);
            continue;
        }

        let mut value = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if value.len() + chunk.len() > MAX_FIELD_SIZE {
                return Err(AppError::InvalidInput(format!("field {} is too large", name)));
            }
            value.extend_from_slice(&chunk);
        }

        let value = String::from_utf8(value)
            .map_err(|_| AppError::InvalidInput(format!("field {} is not valid UTF-8", name)))?;
        if !form.params.set_field(&name, value) {
            info!("Ignoring unknown form field {}", name);
        }
    }

    Ok(form)
}

/// Drain a multipart field without saving.
async fn drain_field(field: &mut actix_multipart::Field) {
    while let Some(chunk) = field.next().await {
        let _ = chunk;
    }
}
