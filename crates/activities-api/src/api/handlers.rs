//! HTTP request handlers.

use super::types::{EmailQuery, HealthResponse, MessageResponse};
use super::AppState;
use crate::error::ApiError;
use activity_store::ActivityListing;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use tracing::info;

/// Send browsers to the static front-end.
pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let activity_count = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        activity_count,
    }))
}

/// List every activity keyed by name.
pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<ActivityListing>, ApiError> {
    let activities = state.store.list_activities().await?;
    Ok(Json(activities))
}

/// Sign a student up for an activity.
pub async fn signup(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!(activity = %activity_name, email = %query.email, "Signup request received");

    let message = state.store.signup(&activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}

/// Unregister a student from an activity.
pub async fn unregister(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!(activity = %activity_name, email = %query.email, "Unregister request received");

    let message = state.store.unregister(&activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}
