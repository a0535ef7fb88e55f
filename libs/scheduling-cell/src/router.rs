use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_availability_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/practitioner/{id}", get(get_practitioner_availability))
        .with_state(config)
}

pub fn create_appointment_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_appointments))
        .route("/", post(book_appointment))
        .route("/{id}", get(get_appointment))
        .route("/{id}", put(update_appointment))
        .route("/patient/{id}", get(list_patient_appointments))
        .route("/check-availability", post(check_availability))
        .with_state(config)
}
