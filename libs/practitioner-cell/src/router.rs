use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_practitioner_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_practitioners))
        .route("/{id}", get(get_practitioner))
        .with_state(config)
}
