use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;

use crate::codec::{self, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::config::Config;
use crate::data::{Cell, DistributionInput, DistributionOutput, DistributionResult, SeatSummary};
use crate::extractor::count_students;
use crate::export::to_tables;
use crate::pipeline::{self, DistributionOutcome, OutcomeStatus};

#[derive(Debug, Serialize)]
struct SheetOverview {
    name: String,
    rows: Vec<Vec<Cell>>,
    students: usize,
}

#[derive(Debug, Serialize)]
struct DecodedWorkbook {
    sheets: Vec<SheetOverview>,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: OutcomeStatus,
    message: &'static str,
}

async fn decode_handler(body: Bytes) -> Result<Json<DecodedWorkbook>, (StatusCode, String)> {
    let workbook = codec::decode(&body).map_err(|e| {
        warn!("Rejected upload of {} byte(s): {}", body.len(), e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let sheets = workbook
        .sheets
        .iter()
        .map(|sheet| SheetOverview {
            name: sheet.name.clone(),
            rows: sheet.rows.clone(),
            students: count_students(&workbook, std::slice::from_ref(&sheet.name)),
        })
        .collect();
    Ok(Json(DecodedWorkbook { sheets }))
}

async fn preview_handler(Json(input): Json<DistributionInput>) -> Json<SeatSummary> {
    Json(pipeline::seat_summary(&input))
}

async fn solve_handler(
    State(config): State<Arc<Config>>,
    Json(input): Json<DistributionInput>,
) -> Result<Json<DistributionOutput>, (StatusCode, Json<StatusBody>)> {
    let outcome = match config.seed {
        Some(seed) => pipeline::distribute_with(&input, &mut StdRng::seed_from_u64(seed)),
        None => pipeline::distribute(&input),
    };

    match outcome {
        DistributionOutcome::Distributed(result) => {
            let summary = result.summary();
            Ok(Json(DistributionOutput { result, summary }))
        }
        other => {
            let status = other.status();
            info!("Distribution not run: {}", status.message());
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(StatusBody {
                    status,
                    message: status.message(),
                }),
            ))
        }
    }
}

async fn export_handler(
    Json(result): Json<DistributionResult>,
) -> Result<Response, (StatusCode, String)> {
    let bytes = codec::encode(&to_tables(&result))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub fn router(config: Arc<Config>) -> Router {
    let body_limit = config.max_upload_bytes();
    Router::new()
        .route("/v1/workbook/decode", post(decode_handler))
        .route("/v1/distribution/preview", post(preview_handler))
        .route("/v1/distribution/solve", post(solve_handler))
        .route("/v1/distribution/export", post(export_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(config)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind = config.bind;
    let app = router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
