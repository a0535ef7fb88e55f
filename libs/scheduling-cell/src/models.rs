use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use shared_models::AppError;
use uuid::Uuid;

// ==============================================================================
// TIME PRIMITIVES
// ==============================================================================

/// Half-open interval [start, end) on the UTC timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn from_start_duration(start: DateTime<Utc>, duration_minutes: i32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes as i64),
        }
    }

    /// The single overlap rule used by both read-time slot marking and
    /// write-time booking validation. Half-open: intervals that merely touch
    /// at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A fixed-duration candidate appointment window with a computed free flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub practitioner_id: Uuid,
    pub is_free: bool,
}

impl Slot {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.date.and_time(self.start_time).and_utc(),
            end: self.date.and_time(self.end_time).and_utc(),
        }
    }
}

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

pub const DEFAULT_APPOINTMENT_MINUTES: i32 = 30;

/// Upper bound on a single appointment: one working day. The conflict
/// queries size their lookback windows to this cap, so accepting a longer
/// duration would let an existing appointment escape the overlap check.
pub const MAX_APPOINTMENT_MINUTES: i32 = 480;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start_time,
            end: self.end_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub practitioner_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub practitioner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentListQuery {
    pub offset: Option<i32>,
    pub limit: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub practitioner_id: Uuid,
    pub practitioner_name: String,
    pub specialty: String,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub slots: Vec<Slot>,
    pub free_count: usize,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Practitioner not found")]
    PractitionerNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("The practitioner is not available at the requested time")]
    SlotUnavailable,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Request timed out")]
    Timeout,
}

impl From<shared_database::DatabaseError> for SchedulingError {
    fn from(e: shared_database::DatabaseError) -> Self {
        match e {
            shared_database::DatabaseError::Timeout => SchedulingError::Timeout,
            other => SchedulingError::Database(other.to_string()),
        }
    }
}

impl From<practitioner_cell::PractitionerError> for SchedulingError {
    fn from(e: practitioner_cell::PractitionerError) -> Self {
        match e {
            practitioner_cell::PractitionerError::NotFound => SchedulingError::PractitionerNotFound,
            practitioner_cell::PractitionerError::Timeout => SchedulingError::Timeout,
            practitioner_cell::PractitionerError::Database(msg) => SchedulingError::Database(msg),
        }
    }
}

impl From<patient_cell::PatientError> for SchedulingError {
    fn from(e: patient_cell::PatientError) -> Self {
        match e {
            patient_cell::PatientError::NotFound => SchedulingError::PatientNotFound,
            patient_cell::PatientError::Timeout => SchedulingError::Timeout,
            other => SchedulingError::Database(other.to_string()),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(e: SchedulingError) -> Self {
        match e {
            SchedulingError::PractitionerNotFound
            | SchedulingError::PatientNotFound
            | SchedulingError::NotFound => AppError::NotFound(e.to_string()),
            SchedulingError::InvalidRange(_) => AppError::BadRequest(e.to_string()),
            SchedulingError::SlotUnavailable => AppError::Conflict(e.to_string()),
            SchedulingError::Database(msg) => AppError::Database(msg),
            SchedulingError::Timeout => AppError::Timeout(e.to_string()),
        }
    }
}
