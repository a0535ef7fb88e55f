use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::models::Slot;
use crate::services::calendar::WorkingHoursPolicy;

/// Generate every candidate slot for a practitioner over an inclusive date
/// range, in chronological order: by date, then window (morning before
/// afternoon), then start time. Callers rely on this ordering for
/// deterministic reports and first-available selection.
///
/// A trailing partial slot that would overrun its window end is dropped.
/// Slots are emitted with `is_free = true`; the availability engine
/// overwrites the flag against the existing appointment set.
pub fn generate_slots(
    practitioner_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    policy: &WorkingHoursPolicy,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    let duration = policy.slot_duration();

    let mut current_date = start_date;
    while current_date <= end_date {
        for (window_start, window_end) in policy.windows_for(current_date.weekday()) {
            let mut cursor = current_date.and_time(window_start).and_utc();
            let window_end_dt = current_date.and_time(window_end).and_utc();

            while cursor + duration <= window_end_dt {
                slots.push(Slot {
                    date: current_date,
                    start_time: cursor.time(),
                    end_time: (cursor + duration).time(),
                    practitioner_id,
                    is_free: true,
                });
                cursor += duration;
            }
        }

        current_date += Duration::days(1);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn monday() -> NaiveDate {
        // 2025-03-10 is a Monday
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn single_monday_yields_sixteen_slots() {
        let slots = generate_slots(
            Uuid::new_v4(),
            monday(),
            monday(),
            &WorkingHoursPolicy::default(),
        );

        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(slots[0].end_time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(
            slots[15].start_time,
            NaiveTime::from_hms_opt(17, 30, 0).unwrap()
        );
        assert_eq!(slots[15].end_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn slots_are_in_chronological_order_over_varied_ranges() {
        // Sweep every weekday as a starting point and range lengths up to
        // three weeks, covering weekends and multi-week spans.
        let policy = WorkingHoursPolicy::default();
        for offset in 0..14 {
            for len in 0..21 {
                let start = monday() + Duration::days(offset);
                let end = start + Duration::days(len);
                let slots = generate_slots(Uuid::new_v4(), start, end, &policy);

                let starts: Vec<_> = slots.iter().map(|s| s.interval().start).collect();
                let mut sorted = starts.clone();
                sorted.sort();
                assert_eq!(starts, sorted, "out of order for {} + {} days", start, len);
            }
        }
    }

    #[test]
    fn weekend_days_contribute_no_slots() {
        // 2025-03-15 is a Saturday
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let slots = generate_slots(
            Uuid::new_v4(),
            saturday,
            saturday + Duration::days(1),
            &WorkingHoursPolicy::default(),
        );

        assert!(slots.is_empty());
    }

    #[test]
    fn every_slot_lies_within_a_single_window() {
        let policy = WorkingHoursPolicy::default();
        let slots = generate_slots(
            Uuid::new_v4(),
            monday(),
            monday() + Duration::days(13),
            &policy,
        );

        for slot in &slots {
            let in_morning =
                slot.start_time >= policy.morning_start && slot.end_time <= policy.morning_end;
            let in_afternoon = slot.start_time >= policy.afternoon_start
                && slot.end_time <= policy.afternoon_end;
            assert!(in_morning || in_afternoon, "slot {:?} crosses a window", slot);
        }
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        let policy = WorkingHoursPolicy {
            morning_end: NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
            ..WorkingHoursPolicy::default()
        };

        let slots = generate_slots(Uuid::new_v4(), monday(), monday(), &policy);

        // Morning 08:00-09:45 fits three 30-minute slots; the 09:30-10:00
        // candidate would overrun the window and must not be emitted.
        let morning: Vec<_> = slots
            .iter()
            .filter(|s| s.start_time < policy.afternoon_start)
            .collect();
        assert_eq!(morning.len(), 3);
        assert_eq!(
            morning.last().unwrap().end_time,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[test]
    fn slot_duration_matches_policy() {
        let slots = generate_slots(
            Uuid::new_v4(),
            monday(),
            monday(),
            &WorkingHoursPolicy::default(),
        );

        for slot in &slots {
            let interval = slot.interval();
            assert_eq!((interval.end - interval.start).num_minutes(), 30);
        }
    }
}
