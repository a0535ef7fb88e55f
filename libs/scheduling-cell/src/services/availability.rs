use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use practitioner_cell::services::PractitionerService;
use shared_config::AppConfig;

use crate::models::{AvailabilityReport, SchedulingError, TimeInterval};
use crate::services::appointments::AppointmentRepository;
use crate::services::calendar::WorkingHoursPolicy;
use crate::services::conflict::is_interval_free;
use crate::services::slots::generate_slots;

const MAX_RANGE_DAYS: i64 = 60;
const DEFAULT_RANGE_WEEKS: i64 = 4;

pub struct AvailabilityService {
    appointments: AppointmentRepository,
    practitioners: PractitionerService,
    policy: WorkingHoursPolicy,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_policy(config, WorkingHoursPolicy::default())
    }

    pub fn with_policy(config: &AppConfig, policy: WorkingHoursPolicy) -> Self {
        Self {
            appointments: AppointmentRepository::new(config),
            practitioners: PractitionerService::new(config),
            policy,
        }
    }

    /// Build the availability report for a practitioner over an inclusive
    /// date range. Pure read: the result is a snapshot, valid only until
    /// the underlying appointment set changes.
    pub async fn get_availability(
        &self,
        practitioner_id: Uuid,
        range_start: Option<NaiveDate>,
        range_end: Option<NaiveDate>,
    ) -> Result<AvailabilityReport, SchedulingError> {
        let today = Utc::now().date_naive();
        let range_start = range_start.unwrap_or(today);
        let range_end = range_end.unwrap_or(range_start + Duration::weeks(DEFAULT_RANGE_WEEKS));

        // Fail fast on invalid ranges, before any collaborator call.
        if range_end < range_start {
            return Err(SchedulingError::InvalidRange(
                "end date is before start date".to_string(),
            ));
        }
        if (range_end - range_start).num_days() > MAX_RANGE_DAYS {
            return Err(SchedulingError::InvalidRange(format!(
                "date range cannot exceed {} days",
                MAX_RANGE_DAYS
            )));
        }

        let practitioner = self.practitioners.get_practitioner(practitioner_id).await?;

        debug!(
            "Computing availability for practitioner {} from {} to {}",
            practitioner_id, range_start, range_end
        );

        // Pull in appointments that start up to a day before the range but
        // may extend into it; durations are capped below a day, so the pad
        // covers them all, and the overlap predicate discards the rest.
        let fetch_from = range_start.and_hms_opt(0, 0, 0).unwrap().and_utc() - Duration::days(1);
        let fetch_to = (range_end + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        let existing = self
            .appointments
            .scheduled_between(practitioner_id, fetch_from, fetch_to, None)
            .await?;
        let existing_intervals: Vec<TimeInterval> =
            existing.iter().map(|apt| apt.interval()).collect();

        let mut slots = generate_slots(practitioner_id, range_start, range_end, &self.policy);
        for slot in &mut slots {
            slot.is_free = is_interval_free(&slot.interval(), &existing_intervals);
        }

        let free_count = slots.iter().filter(|slot| slot.is_free).count();
        debug!("Found {} free slots out of {}", free_count, slots.len());

        Ok(AvailabilityReport {
            practitioner_id,
            practitioner_name: practitioner.full_name(),
            specialty: practitioner.specialty,
            range_start,
            range_end,
            slots,
            free_count,
        })
    }
}
