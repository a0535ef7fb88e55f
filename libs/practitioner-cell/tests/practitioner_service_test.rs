use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use practitioner_cell::models::PractitionerError;
use practitioner_cell::services::PractitionerService;
use shared_config::AppConfig;

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-key".to_string(),
        request_timeout_secs: 5,
    }
}

#[tokio::test]
async fn get_practitioner_parses_the_row() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![serde_json::json!({
            "id": practitioner_id,
            "first_name": "Ana",
            "last_name": "Ruiz",
            "specialty": "Cardiology",
            "email": "ana.ruiz@clinic.test",
            "phone": null,
            "active": true
        })]))
        .mount(&mock_server)
        .await;

    let service = PractitionerService::new(&test_config(&mock_server));
    let practitioner = service
        .get_practitioner(practitioner_id)
        .await
        .expect("practitioner should parse");

    assert_eq!(practitioner.full_name(), "Ana Ruiz");
    assert!(practitioner.active);
}

#[tokio::test]
async fn missing_practitioner_maps_to_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&mock_server)
        .await;

    let service = PractitionerService::new(&test_config(&mock_server));
    let result = service.get_practitioner(Uuid::new_v4()).await;

    assert!(matches!(result, Err(PractitionerError::NotFound)));
}
