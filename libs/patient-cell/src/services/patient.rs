use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        parse_patient(result[0].clone())
    }

    pub async fn list_patients(
        &self,
        offset: i32,
        limit: i32,
    ) -> Result<Vec<Patient>, PatientError> {
        debug!("Listing patients (offset {}, limit {})", offset, limit);

        let path = format!(
            "/rest/v1/patients?order=last_name.asc&offset={}&limit={}",
            offset, limit
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        result.into_iter().map(parse_patient).collect()
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Creating new patient profile for: {}", request.email);

        let existing_check_path = format!(
            "/rest/v1/patients?email=eq.{}",
            urlencoding::encode(&request.email)
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &existing_check_path, None)
            .await?;

        if !existing.is_empty() {
            return Err(PatientError::EmailAlreadyRegistered(request.email));
        }

        let patient_data = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "email": request.email,
            "phone": request.phone,
            "date_of_birth": request.date_of_birth.format("%Y-%m-%d").to_string(),
            "address": request.address,
            "emergency_contact": request.emergency_contact,
            "emergency_phone": request.emergency_phone,
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
                "/rest/v1/patients",
                Some(patient_data),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(PatientError::Database(
                "Failed to create patient profile".to_string(),
            ));
        }

        let patient = parse_patient(result[0].clone())?;
        debug!("Patient profile created with ID: {}", patient.id);

        Ok(patient)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient profile: {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(emergency_contact) = request.emergency_contact {
            update_data.insert("emergency_contact".to_string(), json!(emergency_contact));
        }
        if let Some(emergency_phone) = request.emergency_phone {
            update_data.insert("emergency_phone".to_string(), json!(emergency_phone));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
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
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        parse_patient(result[0].clone())
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), PatientError> {
        debug!("Deleting patient profile: {}", patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, None, Some(headers))
            .await?;

        if result.is_empty() {
            return Err(PatientError::NotFound);
        }

        Ok(())
    }
}

fn parse_patient(value: Value) -> Result<Patient, PatientError> {
    serde_json::from_value(value)
        .map_err(|e| PatientError::Database(format!("Failed to parse patient: {}", e)))
}
