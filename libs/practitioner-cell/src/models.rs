use serde::{Deserialize, Serialize};
use shared_models::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
}

impl Practitioner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PractitionerError {
    #[error("Practitioner not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<shared_database::DatabaseError> for PractitionerError {
    fn from(e: shared_database::DatabaseError) -> Self {
        match e {
            shared_database::DatabaseError::Timeout => PractitionerError::Timeout,
            other => PractitionerError::Database(other.to_string()),
        }
    }
}

impl From<PractitionerError> for AppError {
    fn from(e: PractitionerError) -> Self {
        match e {
            PractitionerError::NotFound => AppError::NotFound(e.to_string()),
            PractitionerError::Database(msg) => AppError::Database(msg),
            PractitionerError::Timeout => AppError::Timeout(e.to_string()),
        }
    }
}
