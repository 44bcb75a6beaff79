pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matchmaking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::form_page))
        .route("/health", get(health::health_handler))
        .route("/api/v1/match", post(handlers::handle_match))
        .with_state(state)
}
