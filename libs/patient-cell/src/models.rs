use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_models::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientListQuery {
    pub offset: Option<i32>,
    pub limit: Option<i32>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient with email {0} already exists")]
    EmailAlreadyRegistered(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<shared_database::DatabaseError> for PatientError {
    fn from(e: shared_database::DatabaseError) -> Self {
        match e {
            shared_database::DatabaseError::Timeout => PatientError::Timeout,
            other => PatientError::Database(other.to_string()),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::NotFound => AppError::NotFound(e.to_string()),
            PatientError::EmailAlreadyRegistered(_) => AppError::BadRequest(e.to_string()),
            PatientError::Database(msg) => AppError::Database(msg),
            PatientError::Timeout => AppError::Timeout(e.to_string()),
        }
    }
}
