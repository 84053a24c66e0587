use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::domain::{AppraisalForm, FacultyId, SubmissionId};
use super::repository::{DecisionStore, StoreError, SubmissionStore};
use super::service::{AppraisalService, AppraisalServiceError};
use super::session::{Role, Session, SessionError, SessionRegistry, SessionState, SessionToken};
use crate::error::AppError;
use crate::publications::PublicationDataset;
use crate::scoring::{compute_score, PublicationCounts, Rating, TeachingCell};

/// Largest accepted publication CSV upload. Institute exports with abstracts
/// run to tens of thousands of rows, well past axum's 2 MB default.
pub const DATASET_UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Shared handler context: the appraisal service plus the live sessions.
pub struct AppraisalApi<S, D> {
    pub service: Arc<AppraisalService<S, D>>,
    pub sessions: Arc<SessionRegistry>,
}

impl<S, D> Clone for AppraisalApi<S, D> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub teaching: Vec<TeachingCell>,
    #[serde(default)]
    pub publications: PublicationCounts,
    #[serde(default)]
    pub projects: u32,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub rating: Rating,
    #[serde(default)]
    pub finalize: bool,
}

/// Router builder exposing sign-in, publication search, intake, and review endpoints.
pub fn appraisal_router<S, D>(
    service: Arc<AppraisalService<S, D>>,
    sessions: Arc<SessionRegistry>,
) -> Router
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    Router::new()
        .route("/api/v1/session/login", post(login_handler::<S, D>))
        .route("/api/v1/session/logout", post(logout_handler::<S, D>))
        .route("/api/v1/session", get(session_handler::<S, D>))
        .route(
            "/api/v1/publications/dataset",
            put(upload_dataset_handler::<S, D>)
                .layer(DefaultBodyLimit::max(DATASET_UPLOAD_LIMIT)),
        )
        .route(
            "/api/v1/publications/search",
            post(search_handler::<S, D>),
        )
        .route("/api/v1/score", post(score_handler))
        .route(
            "/api/v1/appraisals",
            post(submit_handler::<S, D>).get(list_handler::<S, D>),
        )
        .route(
            "/api/v1/appraisals/preview",
            post(preview_handler::<S, D>),
        )
        .route(
            "/api/v1/appraisals/:submission_id",
            get(review_handler::<S, D>),
        )
        .route(
            "/api/v1/appraisals/:submission_id/decision",
            post(decision_handler::<S, D>),
        )
        .with_state(AppraisalApi { service, sessions })
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(SessionToken(token.to_string()))
    }
}

fn authorize(
    sessions: &SessionRegistry,
    headers: &HeaderMap,
    role: Option<Role>,
) -> Result<Session, Response> {
    let token = bearer_token(headers)
        .ok_or_else(|| session_error_response(SessionError::Unauthenticated))?;
    let outcome = match role {
        Some(role) => sessions.require(&token, role),
        None => sessions.resolve(&token),
    };
    outcome.map_err(session_error_response)
}

fn session_error_response(error: SessionError) -> Response {
    let status = match error {
        SessionError::InvalidCredentials | SessionError::Unauthenticated => {
            StatusCode::UNAUTHORIZED
        }
        SessionError::Forbidden(_) => StatusCode::FORBIDDEN,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

fn service_error_response(error: AppraisalServiceError) -> Response {
    let status = match &error {
        AppraisalServiceError::DatasetUnavailable | AppraisalServiceError::AlreadyFinalized(_) => {
            StatusCode::CONFLICT
        }
        AppraisalServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AppraisalServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn login_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    match api.sessions.login(&request.username, &request.password) {
        Ok(state) => match state.session() {
            Some(session) => (StatusCode::OK, Json(session.clone())).into_response(),
            None => session_error_response(SessionError::InvalidCredentials),
        },
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn logout_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Some(token) = bearer_token(&headers) {
        api.sessions.logout(&token);
    }
    (StatusCode::OK, Json(json!({ "status": "logged_out" }))).into_response()
}

pub(crate) async fn session_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    let state = bearer_token(&headers)
        .map(|token| api.sessions.state(&token))
        .unwrap_or(SessionState::LoggedOut);
    match state.session() {
        Some(session) => (StatusCode::OK, Json(session.clone())).into_response(),
        None => session_error_response(SessionError::Unauthenticated),
    }
}

pub(crate) async fn upload_dataset_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    body: String,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers, Some(Role::Admin)) {
        return response;
    }

    match PublicationDataset::from_reader(Cursor::new(body.into_bytes())) {
        Ok(dataset) => {
            let records = api.service.replace_dataset(dataset);
            (StatusCode::OK, Json(json!({ "records": records }))).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn search_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers, None) {
        return response;
    }

    match api.service.search(request.query.as_deref()) {
        Ok(results) => {
            debug!(query = ?request.query, hits = results.len(), "publication search");
            (
                StatusCode::OK,
                Json(json!({ "query": request.query, "results": results })),
            )
                .into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn score_handler(Json(request): Json<ScoreRequest>) -> Response {
    let breakdown = compute_score(&request.teaching, request.publications, request.projects);
    (StatusCode::OK, Json(breakdown)).into_response()
}

pub(crate) async fn preview_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    Json(form): Json<AppraisalForm>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers, Some(Role::Faculty)) {
        return response;
    }

    (StatusCode::OK, Json(api.service.preview(&form))).into_response()
}

pub(crate) async fn submit_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    Json(form): Json<AppraisalForm>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    let session = match authorize(&api.sessions, &headers, Some(Role::Faculty)) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let submitted_at = Local::now().naive_local();
    match api
        .service
        .submit(FacultyId(session.username), form, submitted_at)
    {
        Ok(submission) => (StatusCode::CREATED, Json(submission)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers, Some(Role::Admin)) {
        return response;
    }

    match api.service.summaries() {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn review_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    Path(submission_id): Path<String>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers, Some(Role::Admin)) {
        return response;
    }

    match api.service.review(&SubmissionId(submission_id)) {
        Ok(review) => (StatusCode::OK, Json(review)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn decision_handler<S, D>(
    State(api): State<AppraisalApi<S, D>>,
    headers: HeaderMap,
    Path(submission_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    let session = match authorize(&api.sessions, &headers, Some(Role::Admin)) {
        Ok(session) => session,
        Err(response) => return response,
    };

    let decided_at = Local::now().naive_local();
    match api.service.decide(
        &SubmissionId(submission_id),
        request.rating,
        &session.username,
        request.finalize,
        decided_at,
    ) {
        Ok(decision) => (StatusCode::CREATED, Json(decision)).into_response(),
        Err(error) => service_error_response(error),
    }
}
