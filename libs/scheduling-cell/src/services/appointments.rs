use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus, SchedulingError};

/// Storage collaborator for appointment rows. All mutable scheduling state
/// lives behind this boundary; the engines above it are read-mostly.
pub struct AppointmentRepository {
    supabase: SupabaseClient,
}

impl AppointmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Scheduled appointments for a practitioner with a start time in
    /// [from, to). Cancelled and completed rows never participate in
    /// overlap checks, so they are filtered out at the source.
    pub async fn scheduled_between(
        &self,
        practitioner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut query_parts = vec![
            format!("practitioner_id=eq.{}", practitioner_id),
            format!("status=eq.{}", AppointmentStatus::Scheduled),
            format!("start_time=gte.{}", urlencoding::encode(&from.to_rfc3339())),
            format!("start_time=lt.{}", urlencoding::encode(&to.to_rfc3339())),
        ];

        if let Some(exclude) = exclude_id {
            query_parts.push(format!("id=neq.{}", exclude));
        }

        let path = format!(
            "/rest/v1/appointments?{}&order=start_time.asc",
            query_parts.join("&")
        );

        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        result.into_iter().map(parse_appointment).collect()
    }

    pub async fn insert(
        &self,
        patient_id: Uuid,
        practitioner_id: Uuid,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        notes: Option<String>,
    ) -> Result<Appointment, SchedulingError> {
        let appointment_data = json!({
            "patient_id": patient_id,
            "practitioner_id": practitioner_id,
            "start_time": start_time.to_rfc3339(),
            "duration_minutes": duration_minutes,
            "status": AppointmentStatus::Scheduled.to_string(),
            "notes": notes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(appointment_data),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(SchedulingError::Database(
                "Failed to create appointment".to_string(),
            ));
        }

        parse_appointment(result[0].clone())
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, SchedulingError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }

        parse_appointment(result[0].clone())
    }

    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        offset: i32,
        limit: i32,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&order=start_time.desc&offset={}&limit={}",
            patient_id, offset, limit
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        result.into_iter().map(parse_appointment).collect()
    }

    pub async fn list_all(
        &self,
        offset: i32,
        limit: i32,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?order=start_time.desc&offset={}&limit={}",
            offset, limit
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        result.into_iter().map(parse_appointment).collect()
    }

    pub async fn update(
        &self,
        appointment_id: Uuid,
        changes: serde_json::Map<String, Value>,
    ) -> Result<Appointment, SchedulingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(changes)),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(SchedulingError::NotFound);
        }

        parse_appointment(result[0].clone())
    }
}

fn parse_appointment(value: Value) -> Result<Appointment, SchedulingError> {
    serde_json::from_value(value)
        .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e)))
}
