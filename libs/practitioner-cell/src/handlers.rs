use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::AppError;

use crate::services::PractitionerService;

#[axum::debug_handler]
pub async fn list_practitioners(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerService::new(&config);

    let practitioners = service.list_active().await.map_err(AppError::from)?;
    let total = practitioners.len();

    Ok(Json(json!({
        "practitioners": practitioners,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn get_practitioner(
    State(config): State<Arc<AppConfig>>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerService::new(&config);

    let practitioner = service
        .get_practitioner(practitioner_id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(json!(practitioner)))
}
