//! Handler for the /iss endpoint.
//!
//! This module implements the data endpoint that serves a track's measurements,
//! its metadata sidecar, or both bundled in a zip archive, as a file download.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::logging::{generate_request_id, log_request_end, log_request_error};
use crate::query::{DataQuery, DataRequest};
use crate::service::{get_data, DataResponse};
use crate::state::AppState;

/// Path the data endpoint is mounted on
pub const DATA_ENDPOINT: &str = "/iss";

/// Handle GET /iss requests
pub async fn data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = DATA_ENDPOINT,
        request_id = %request_id,
        source_id = ?params.source_id,
        program = ?params.program,
        datasource = ?params.datasource,
        format = ?params.format,
        "Processing data request"
    );

    match process_data_request(&state, &params)
        .await
        .and_then(build_response)
    {
        Ok((response, filename, bytes)) => {
            log_request_end(DATA_ENDPOINT, &request_id, start_time, &filename, bytes);
            response
        }
        Err(error) => {
            log_request_error(
                &error,
                DATA_ENDPOINT,
                &request_id,
                Some(&format!("{:?}", params)),
            );
            error.into_response()
        }
    }
}

async fn process_data_request(state: &AppState, params: &DataQuery) -> Result<DataResponse> {
    let request = DataRequest::from_query(params, state.default_format, Utc::now())?;
    get_data(state, &request).await
}

/// Turn an assembled response into an attachment download
fn build_response(data: DataResponse) -> Result<(Response, String, usize)> {
    let disposition = format!("attachment; filename=\"{}\"", data.filename);
    let disposition =
        HeaderValue::from_bytes(disposition.as_bytes()).map_err(|e| GatewayError::Server {
            message: format!("Invalid download filename {}: {}", data.filename, e),
        })?;

    let bytes = data.body.len();
    let response = (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(data.format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data.body,
    )
        .into_response();

    Ok((response, data.filename, bytes))
}
