use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::directory::{CachedDirectory, ClinicRecord, RemoteDirectory};
use crate::matching::{ClinicMatcher, MatchResult};
use crate::questionnaire::catalog::{self, QuestionSpec, ValidationNote};
use crate::questionnaire::ResponseSet;

#[derive(Clone)]
struct ApiState {
    config: Config,
    directory: Arc<CachedDirectory>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize, Default)]
struct MatchRequest {
    #[serde(default)]
    responses: ResponseSet,
    #[serde(default)]
    advanced: Option<ResponseSet>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ClinicsResponse {
    clinics: Vec<ClinicRecord>,
}

#[derive(Debug, Serialize)]
struct QuestionsResponse {
    version: u32,
    questions: Vec<QuestionSpec>,
    advanced_questions: Vec<QuestionSpec>,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    total_clinics: usize,
    matches: Vec<MatchResult>,
    validation_notes: Vec<ValidationNote>,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let provider = RemoteDirectory::with_timeout(
        config.directory.source_url.clone(),
        config.directory.request_timeout_secs,
    )?;
    let directory = Arc::new(CachedDirectory::new(
        Arc::new(provider),
        Duration::from_secs(config.directory.cache_ttl_secs),
        config.directory.static_fallback,
    ));
    let state = ApiState { config, directory };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/clinics", get(clinics))
        .route("/v1/questions", get(questions))
        .route("/v1/match", post(find_matches))
        .route("/v1/config", get(show_config))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn clinics(State(state): State<ApiState>) -> ApiResult<ClinicsResponse> {
    let clinics = state.directory.clinics().await;
    Ok(ok(ClinicsResponse { clinics }))
}

async fn questions() -> ApiResult<QuestionsResponse> {
    Ok(ok(QuestionsResponse {
        version: catalog::CATALOG_VERSION,
        questions: catalog::questions(),
        advanced_questions: catalog::advanced_questions(),
    }))
}

/// Answers with unknown tokens still match: the scorers degrade to their
/// neutral defaults, and the catalog notes come back advisory-only.
async fn find_matches(
    State(state): State<ApiState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<MatchResponse> {
    let clinics = state.directory.clinics().await;
    let total_clinics = clinics.len();

    let mut matcher_config = state.config.matcher_config();
    if let Some(limit) = request.limit {
        if limit == 0 {
            return Err(ApiError::bad_request("limit must be at least 1"));
        }
        matcher_config.result_limit = limit.min(10);
    }

    let mut validation_notes = catalog::validate(&request.responses);
    if let Some(advanced) = &request.advanced {
        validation_notes.extend(catalog::validate(advanced));
    }

    let matcher = ClinicMatcher::with_config(clinics, matcher_config);
    let matches = matcher.matches(&request.responses, request.advanced.as_ref());

    Ok(ok(MatchResponse {
        total_clinics,
        matches,
        validation_notes,
    }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
