//! Event endpoints

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use daybook_core::day::parse_day;
use daybook_core::query::DEFAULT_UPCOMING_COUNT;
use daybook_core::{DaybookError, Event, EventDraft};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/upcoming", get(upcoming_events))
        .route("/events/date/{date}", get(events_on_date))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// GET /events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.repository().list_all().await?))
}

/// GET /events/:id
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.repository().get_by_id(&id).await?))
}

/// POST /events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let Json(draft) = body.map_err(|e| DaybookError::Validation(e.body_text()))?;
    let event = state.repository().create(draft).await?;
    tracing::info!(id = %event.id, title = %event.title, "created event");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /events/:id - Replace an event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Event>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Json(event) = body.map_err(|e| DaybookError::Validation(e.body_text()))?;
    if event.id != id {
        return Err(DaybookError::Validation(format!(
            "event id '{}' does not match path id '{}'",
            event.id, id
        ))
        .into());
    }
    Ok(Json(state.repository().update(event).await?))
}

/// DELETE /events/:id
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository().delete(&id).await?;
    tracing::info!(id = %id, "deleted event");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /events/date/:date - Events starting on a day (YYYY-MM-DD)
async fn events_on_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    let date = parse_day(&date)?;
    Ok(Json(state.repository().list_by_date(date).await?))
}

#[derive(Deserialize)]
struct UpcomingQuery {
    count: Option<usize>,
}

/// GET /events/upcoming?count=N
async fn upcoming_events(
    State(state): State<AppState>,
    query: Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, AppError> {
    let Query(query) = query.map_err(|e| DaybookError::Validation(e.body_text()))?;
    let count = query.count.unwrap_or(DEFAULT_UPCOMING_COUNT);
    Ok(Json(state.repository().list_upcoming(count).await?))
}
