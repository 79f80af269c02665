//! HTTP event service for daybook.
//!
//! Serves the event resource under `/api` from any
//! `daybook_core::EventRepository`; the binary uses the in-memory one.

pub mod routes;
mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::events::router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
