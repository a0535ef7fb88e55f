use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Practitioner, PractitionerError};

pub struct PractitionerService {
    supabase: SupabaseClient,
}

impl PractitionerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_practitioner(
        &self,
        practitioner_id: Uuid,
    ) -> Result<Practitioner, PractitionerError> {
        debug!("Fetching practitioner: {}", practitioner_id);

        let path = format!("/rest/v1/practitioners?id=eq.{}", practitioner_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        if result.is_empty() {
            return Err(PractitionerError::NotFound);
        }

        let practitioner: Practitioner = serde_json::from_value(result[0].clone())
            .map_err(|e| PractitionerError::Database(format!("Failed to parse practitioner: {}", e)))?;

        Ok(practitioner)
    }

    pub async fn list_active(&self) -> Result<Vec<Practitioner>, PractitionerError> {
        debug!("Fetching active practitioners");

        let path = "/rest/v1/practitioners?active=eq.true&order=last_name.asc";
        let result: Vec<Value> = self.supabase.request(Method::GET, path, None).await?;

        let practitioners: Vec<Practitioner> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PractitionerError::Database(format!("Failed to parse practitioners: {}", e)))?;

        Ok(practitioners)
    }
}
