//! HTTP route handlers for the exercise API.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;

use exercise_core::{
    append_entry, query_log, Error, ExerciseAdded, FieldError, LogQuery, LogView, UserStore,
    UserSummary,
};

use crate::error::ApiError;
use crate::request::{AddExerciseRequest, LogParams, NewUserRequest, Payload};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// Run a store operation on the blocking pool
///
/// The file store holds fs2 locks and does synchronous IO; async workers
/// must stay free while another process holds the lock.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> exercise_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => Ok(result?),
        Err(e) => Err(Error::Other(format!("store task failed: {}", e)).into()),
    }
}

fn require_user_id(user_id: Option<String>) -> Result<String, ApiError> {
    match user_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(Error::Validation(vec![FieldError::required("userId")]).into()),
    }
}

/// Handle GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle POST /api/exercise/new-user
pub async fn handle_new_user(
    State(state): State<AppState>,
    Payload(request): Payload<NewUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let username = request.username.unwrap_or_default();
    let store = state.store.clone();
    let user = blocking(move || store.create(&username)).await?;
    tracing::info!("Created user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user.summary())))
}

/// Handle POST /api/exercise/add
pub async fn handle_add_exercise(
    State(state): State<AppState>,
    Payload(request): Payload<AddExerciseRequest>,
) -> Result<Json<ExerciseAdded>, ApiError> {
    let (user_id, new_entry) = request.into_parts();
    let user_id = require_user_id(user_id)?;

    let store = state.store.clone();
    let outcome = blocking(move || {
        let user = store.find_by_id(&user_id)?;
        append_entry(store.as_ref(), user, new_entry)
    })
    .await?;

    Ok(Json(ExerciseAdded::new(&outcome.user, &outcome.entry)))
}

/// Handle GET /api/exercise/users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let store = state.store.clone();
    Ok(Json(blocking(move || store.list_all()).await?))
}

/// Handle GET /api/exercise/log
pub async fn handle_log(
    State(state): State<AppState>,
    Query(params): Query<LogParams>,
) -> Result<Json<LogView>, ApiError> {
    let user_id = require_user_id(params.user_id)?;
    let store = state.store.clone();
    let user = blocking(move || store.find_by_id(&user_id)).await?;

    let query = LogQuery::parse(
        params.from.as_deref(),
        params.to.as_deref(),
        params.limit.as_deref(),
    );
    Ok(Json(query_log(&user, &query)))
}

/// Handle GET /-/healthy
pub async fn handle_healthy() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for unmatched routes
pub async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
