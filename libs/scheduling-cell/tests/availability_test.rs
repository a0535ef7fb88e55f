use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use scheduling_cell::models::SchedulingError;
use scheduling_cell::services::AvailabilityService;
use shared_config::AppConfig;

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-key".to_string(),
        request_timeout_secs: 5,
    }
}

fn monday() -> NaiveDate {
    // 2025-03-10 is a Monday
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

async fn mock_practitioner(mock_server: &MockServer, practitioner_id: Uuid) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![serde_json::json!({
            "id": practitioner_id,
            "first_name": "Ana",
            "last_name": "Ruiz",
            "specialty": "Cardiology",
            "email": "ana.ruiz@clinic.test",
            "phone": "+353000000",
            "active": true
        })]))
        .mount(mock_server)
        .await;
}

async fn mock_appointments(mock_server: &MockServer, body: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn single_monday_reports_sixteen_free_slots() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(&mock_server, vec![]).await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let report = service
        .get_availability(practitioner_id, Some(monday()), Some(monday()))
        .await
        .expect("availability report");

    assert_eq!(report.practitioner_name, "Ana Ruiz");
    assert_eq!(report.specialty, "Cardiology");
    assert_eq!(report.slots.len(), 16);
    assert_eq!(report.free_count, 16);
    assert_eq!(
        report.slots[0].start_time,
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    );
    assert_eq!(
        report.slots[15].start_time,
        NaiveTime::from_hms_opt(17, 30, 0).unwrap()
    );
    assert_eq!(
        report.slots[15].end_time,
        NaiveTime::from_hms_opt(18, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn booked_slot_is_marked_taken_and_others_stay_free() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(
        &mock_server,
        vec![serde_json::json!({
            "id": Uuid::new_v4(),
            "patient_id": Uuid::new_v4(),
            "practitioner_id": practitioner_id,
            "start_time": "2025-03-10T09:00:00Z",
            "duration_minutes": 30,
            "status": "scheduled",
            "notes": null,
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z"
        })],
    )
    .await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let report = service
        .get_availability(practitioner_id, Some(monday()), Some(monday()))
        .await
        .expect("availability report");

    assert_eq!(report.slots.len(), 16);
    assert_eq!(report.free_count, 15);

    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    for slot in &report.slots {
        if slot.start_time == nine {
            assert!(!slot.is_free);
        } else {
            assert!(slot.is_free, "slot at {} should be free", slot.start_time);
        }
    }
}

#[tokio::test]
async fn two_week_range_with_no_appointments_is_fully_free() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(&mock_server, vec![]).await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let report = service
        .get_availability(
            practitioner_id,
            Some(monday()),
            Some(monday() + Duration::days(13)),
        )
        .await
        .expect("availability report");

    assert_eq!(report.free_count, report.slots.len());
    // Ten working days at 16 slots each.
    assert_eq!(report.slots.len(), 160);
}

#[tokio::test]
async fn saturday_only_range_has_zero_slots() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(&mock_server, vec![]).await;

    // 2025-03-15 is a Saturday
    let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let service = AvailabilityService::new(&test_config(&mock_server));
    let report = service
        .get_availability(practitioner_id, Some(saturday), Some(saturday))
        .await
        .expect("availability report");

    assert!(report.slots.is_empty());
    assert_eq!(report.free_count, 0);
}

#[tokio::test]
async fn range_over_sixty_days_is_rejected_before_any_lookup() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();

    // No mocks mounted: the validation must fail before any collaborator call.
    let service = AvailabilityService::new(&test_config(&mock_server));
    let result = service
        .get_availability(
            practitioner_id,
            Some(monday()),
            Some(monday() + Duration::days(61)),
        )
        .await;

    assert!(matches!(result, Err(SchedulingError::InvalidRange(_))));
}

#[tokio::test]
async fn sixty_day_range_is_accepted() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(&mock_server, vec![]).await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let report = service
        .get_availability(
            practitioner_id,
            Some(monday()),
            Some(monday() + Duration::days(60)),
        )
        .await
        .expect("sixty day range should pass validation");

    assert_eq!(report.free_count, report.slots.len());
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let mock_server = MockServer::start().await;
    let service = AvailabilityService::new(&test_config(&mock_server));

    let result = service
        .get_availability(
            Uuid::new_v4(),
            Some(monday()),
            Some(monday() - Duration::days(1)),
        )
        .await;

    assert!(matches!(result, Err(SchedulingError::InvalidRange(_))));
}

#[tokio::test]
async fn unknown_practitioner_is_reported_as_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&mock_server)
        .await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let result = service
        .get_availability(Uuid::new_v4(), Some(monday()), Some(monday()))
        .await;

    assert!(matches!(result, Err(SchedulingError::PractitionerNotFound)));
}

#[tokio::test]
async fn repeated_reports_are_identical_without_intervening_writes() {
    let mock_server = MockServer::start().await;
    let practitioner_id = Uuid::new_v4();
    mock_practitioner(&mock_server, practitioner_id).await;
    mock_appointments(&mock_server, vec![]).await;

    let service = AvailabilityService::new(&test_config(&mock_server));
    let first = service
        .get_availability(practitioner_id, Some(monday()), Some(monday()))
        .await
        .expect("first report");
    let second = service
        .get_availability(practitioner_id, Some(monday()), Some(monday()))
        .await
        .expect("second report");

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}
