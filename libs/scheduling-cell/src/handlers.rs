use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{
    AppointmentListQuery, AvailabilityQuery, BookAppointmentRequest, CheckAvailabilityRequest,
    UpdateAppointmentRequest, DEFAULT_APPOINTMENT_MINUTES,
};
use crate::services::{AvailabilityService, BookingService};

#[axum::debug_handler]
pub async fn get_practitioner_availability(
    State(config): State<Arc<AppConfig>>,
    Path(practitioner_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&config);

    let report = service
        .get_availability(practitioner_id, query.start_date, query.end_date)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointment = service
        .book_appointment(request)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn check_availability(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);
    let duration_minutes = request
        .duration_minutes
        .unwrap_or(DEFAULT_APPOINTMENT_MINUTES);

    let available = service
        .check_availability(request.practitioner_id, request.start_time, duration_minutes)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!({
        "practitioner_id": request.practitioner_id,
        "start_time": request.start_time,
        "duration_minutes": duration_minutes,
        "available": available
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointment = service
        .get_appointment(appointment_id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointments = service
        .list_appointments(query.offset.unwrap_or(0), query.limit.unwrap_or(100))
        .await
        .map_err(AppError::from)?;
    let total = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointments = service
        .list_patient_appointments(patient_id, query.offset.unwrap_or(0), query.limit.unwrap_or(100))
        .await
        .map_err(AppError::from)?;
    let total = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);

    let appointment = service
        .update_appointment(appointment_id, request)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(appointment)))
}
