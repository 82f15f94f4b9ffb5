use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/observations",
            get(handlers::list_observations).post(handlers::put_observation),
        )
        .route(
            "/api/observations/:date",
            get(handlers::get_observation).delete(handlers::delete_observation),
        )
        .route(
            "/api/analysis",
            get(handlers::get_analysis).post(handlers::analyze),
        )
        .with_state(state)
}
