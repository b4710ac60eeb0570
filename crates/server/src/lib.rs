use std::sync::Arc;

use axum::Router;
use db::DBService;
use services::services::generation_api::GenerationSettings;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod routes;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub generation: Arc<GenerationSettings>,
}

impl AppState {
    pub fn new(db: DBService, generation: GenerationSettings) -> Self {
        Self {
            db,
            generation: Arc::new(generation),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
