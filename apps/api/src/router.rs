use std::sync::Arc;

use axum::{routing::get, Router};

use patient_cell::router::create_patient_router;
use practitioner_cell::router::create_practitioner_router;
use scheduling_cell::router::{create_appointment_router, create_availability_router};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medical Appointment API is running!" }))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/practitioners", create_practitioner_router(state.clone()))
        .nest("/availability", create_availability_router(state.clone()))
        .nest("/appointments", create_appointment_router(state))
}
