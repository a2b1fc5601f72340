//! In-process stand-in for a Solr select endpoint.
//!
//! Answers `wt=json` queries with a fixed list of track documents and `wt=csv`
//! queries with a fixed CSV body, recording every query it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use trackgate::{build_app, AppState, Config};

/// Path the fake select handler is mounted on
pub const SELECT_PATH: &str = "/solr/tracks/select";

/// Measurement rows served for every data query
pub const SAMPLE_CSV: &str = "measurement_date_time,lon,lat,depth,sea_water_temperature_d,salinity_d\n\
2024-01-02T03:04:05Z,12.5,-33.25,5.0,18.2,35.1\n\
2024-01-02T03:04:05Z,12.5,-33.25,10.0,17.9,35.2\n";

#[derive(Clone)]
struct FakeState {
    docs: Vec<Value>,
    csv: String,
    status: StatusCode,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Handle on a running fake backend
pub struct FakeSolr {
    pub addr: SocketAddr,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeSolr {
    /// Start a backend serving the given documents and CSV body
    pub async fn start(docs: Vec<Value>, csv: &str) -> Self {
        Self::spawn(docs, csv, StatusCode::OK).await
    }

    /// Start a backend that answers every query with `status`
    pub async fn failing(status: StatusCode) -> Self {
        Self::spawn(vec![argo_track()], SAMPLE_CSV, status).await
    }

    async fn spawn(docs: Vec<Value>, csv: &str, status: StatusCode) -> Self {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            docs,
            csv: csv.to_string(),
            status,
            queries: queries.clone(),
        };
        let app = Router::new()
            .route(SELECT_PATH, get(select))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Solr");
        let addr = listener.local_addr().expect("Fake Solr has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake Solr error");
        });

        Self { addr, queries }
    }

    /// Start a backend holding a single Argo track
    pub async fn with_argo_track() -> Self {
        Self::start(vec![argo_track()], SAMPLE_CSV).await
    }

    /// Select endpoint URL
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, SELECT_PATH)
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().expect("Query log poisoned").clone()
    }

    /// Queries received so far with the given `wt`
    pub fn queries_of(&self, wt: &str) -> Vec<HashMap<String, String>> {
        self.queries()
            .into_iter()
            .filter(|q| q.get("wt").map(String::as_str) == Some(wt))
            .collect()
    }
}

/// A full Solr document for an Argo float track
pub fn argo_track() -> Value {
    json!({
        "id": "argo-4901234",
        "datatype": "track",
        "program": "argo",
        "project": "coriolis",
        "platform": "profiling float",
        "mission": "deployment 7",
        "instrument": "SBE41",
        "source_id": "4901234",
        "title": "Argo float 4901234",
        "description": "Temperature and salinity profiles",
        "variables": ["Sea Water Temperature", "Salinity"],
        "variables_units": ["degC", "psu"],
        "_version_": 1790000000000000000u64
    })
}

async fn select(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let wt = params.get("wt").cloned().unwrap_or_default();
    state
        .queries
        .lock()
        .expect("Query log poisoned")
        .push(params);

    if !state.status.is_success() {
        return (state.status, "backend unavailable").into_response();
    }

    let found = state.docs.len();
    match wt.as_str() {
        "json" => Json(json!({
            "responseHeader": {"status": 0},
            "response": {
                "numFound": found,
                "start": 0,
                "docs": state.docs,
            }
        }))
        .into_response(),
        "csv" => ([(header::CONTENT_TYPE, "text/csv")], state.csv).into_response(),
        _ => (StatusCode::BAD_REQUEST, "unknown wt").into_response(),
    }
}

/// Start a gateway pointed at `solr_url`, caching under `output_dir`
pub async fn start_gateway(solr_url: &str, output_dir: &Path, cache_files: bool) -> SocketAddr {
    let mut config = Config::default();
    config.backend.solr_url = solr_url.to_string();
    config.backend.timeout_secs = 5;
    config.output.output_dir = output_dir.to_path_buf();
    config.output.cache_files = cache_files;

    let state = AppState::new_shared(config)
        .await
        .expect("Failed to build gateway state");
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind gateway");
    let addr = listener.local_addr().expect("Gateway has no address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            axum::ServiceExt::<axum::extract::Request>::into_make_service(app),
        )
        .await
        .expect("Gateway error");
    });

    addr
}
