use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use patient_cell::services::PatientService;
use practitioner_cell::services::PractitionerService;
use shared_config::AppConfig;

use crate::models::{
    Appointment, BookAppointmentRequest, SchedulingError, TimeInterval,
    UpdateAppointmentRequest, DEFAULT_APPOINTMENT_MINUTES, MAX_APPOINTMENT_MINUTES,
};
use crate::services::appointments::AppointmentRepository;
use crate::services::conflict::is_interval_free;

// Durations are capped at MAX_APPOINTMENT_MINUTES, so any appointment that
// could still overlap a candidate starts within this lookback window.
const OVERLAP_LOOKBACK_MINUTES: i64 = MAX_APPOINTMENT_MINUTES as i64;

fn validate_duration(duration_minutes: i32) -> Result<(), SchedulingError> {
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidRange(
            "duration must be positive".to_string(),
        ));
    }
    if duration_minutes > MAX_APPOINTMENT_MINUTES {
        return Err(SchedulingError::InvalidRange(format!(
            "duration cannot exceed {} minutes",
            MAX_APPOINTMENT_MINUTES
        )));
    }
    Ok(())
}

/// Per-practitioner locks serializing the check-then-insert pair. Entries
/// are never evicted; the registry is bounded by the practitioner roster
/// of the clinic. A single engine instance is assumed; deployments running
/// several instances against one database need an exclusion constraint on
/// the appointments table.
static PRACTITIONER_LOCKS: OnceLock<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>> =
    OnceLock::new();

fn practitioner_lock(practitioner_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
    let registry = PRACTITIONER_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut locks = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    locks
        .entry(practitioner_id)
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

pub struct BookingService {
    appointments: AppointmentRepository,
    patients: PatientService,
    practitioners: PractitionerService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: AppointmentRepository::new(config),
            patients: PatientService::new(config),
            practitioners: PractitionerService::new(config),
        }
    }

    /// Book an appointment if and only if the requested slot is free.
    ///
    /// The overlap re-check runs here even when the caller already inspected
    /// an availability report: reports are snapshots and may be stale by the
    /// time the booking arrives.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment for patient {} with practitioner {} on {} at {}",
            request.patient_id, request.practitioner_id, request.date, request.time
        );

        let duration_minutes = request
            .duration_minutes
            .unwrap_or(DEFAULT_APPOINTMENT_MINUTES);
        validate_duration(duration_minutes)?;

        self.patients.get_patient(request.patient_id).await?;
        self.practitioners
            .get_practitioner(request.practitioner_id)
            .await?;

        let start_time = request.date.and_time(request.time).and_utc();
        let candidate = TimeInterval::from_start_duration(start_time, duration_minutes);

        // The lock is held across the conflict check and the insert so two
        // concurrent bookings for the same practitioner cannot both pass the
        // check against the same snapshot.
        let lock = practitioner_lock(request.practitioner_id);
        let _guard = lock.lock().await;

        if !self
            .candidate_is_free(request.practitioner_id, &candidate, None)
            .await?
        {
            warn!(
                "Booking conflict for practitioner {} at {}",
                request.practitioner_id, start_time
            );
            return Err(SchedulingError::SlotUnavailable);
        }

        let appointment = self
            .appointments
            .insert(
                request.patient_id,
                request.practitioner_id,
                start_time,
                duration_minutes,
                request.notes,
            )
            .await?;

        info!(
            "Appointment {} booked for practitioner {}",
            appointment.id, request.practitioner_id
        );
        Ok(appointment)
    }

    /// Run the overlap predicate for a candidate interval without writing.
    pub async fn check_availability(
        &self,
        practitioner_id: Uuid,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
    ) -> Result<bool, SchedulingError> {
        validate_duration(duration_minutes)?;

        let candidate = TimeInterval::from_start_duration(start_time, duration_minutes);
        self.candidate_is_free(practitioner_id, &candidate, None)
            .await
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        self.appointments.get(appointment_id).await
    }

    pub async fn list_appointments(
        &self,
        offset: i32,
        limit: i32,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.appointments.list_all(offset, limit).await
    }

    pub async fn list_patient_appointments(
        &self,
        patient_id: Uuid,
        offset: i32,
        limit: i32,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.patients.get_patient(patient_id).await?;
        self.appointments
            .list_for_patient(patient_id, offset, limit)
            .await
    }

    /// Update status, time or notes of an existing appointment. A time or
    /// duration change re-runs the overlap check, excluding the appointment
    /// itself from the existing set.
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment: {}", appointment_id);

        let current = self.appointments.get(appointment_id).await?;

        let new_start = request.start_time.unwrap_or(current.start_time);
        let new_duration = request.duration_minutes.unwrap_or(current.duration_minutes);
        validate_duration(new_duration)?;

        let time_changed =
            new_start != current.start_time || new_duration != current.duration_minutes;

        let lock = practitioner_lock(current.practitioner_id);
        let _guard = lock.lock().await;

        if time_changed {
            let candidate = TimeInterval::from_start_duration(new_start, new_duration);
            if !self
                .candidate_is_free(current.practitioner_id, &candidate, Some(appointment_id))
                .await?
            {
                return Err(SchedulingError::SlotUnavailable);
            }
        }

        let mut changes = serde_json::Map::new();
        if let Some(start_time) = request.start_time {
            changes.insert("start_time".to_string(), json!(start_time.to_rfc3339()));
        }
        if let Some(duration) = request.duration_minutes {
            changes.insert("duration_minutes".to_string(), json!(duration));
        }
        if let Some(status) = request.status {
            changes.insert("status".to_string(), json!(status.to_string()));
        }
        if let Some(notes) = request.notes {
            changes.insert("notes".to_string(), json!(notes));
        }
        changes.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.appointments.update(appointment_id, changes).await
    }

    /// Narrow-window query plus the shared overlap predicate.
    async fn candidate_is_free(
        &self,
        practitioner_id: Uuid,
        candidate: &TimeInterval,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, SchedulingError> {
        let fetch_from = candidate.start - Duration::minutes(OVERLAP_LOOKBACK_MINUTES);
        let existing = self
            .appointments
            .scheduled_between(practitioner_id, fetch_from, candidate.end, exclude_id)
            .await?;

        let existing_intervals: Vec<TimeInterval> =
            existing.iter().map(|apt| apt.interval()).collect();

        Ok(is_interval_free(candidate, &existing_intervals))
    }
}
