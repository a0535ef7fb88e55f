use chrono::{Duration, NaiveTime, Weekday};

/// Working-hours policy for a practitioner's calendar.
///
/// Passed explicitly into the slot generator so a per-practitioner override
/// can be introduced without touching call sites. The default mirrors the
/// clinic-wide schedule: Monday to Friday, 08:00-12:00 and 14:00-18:00,
/// 30-minute slots.
#[derive(Debug, Clone)]
pub struct WorkingHoursPolicy {
    pub working_days: Vec<Weekday>,
    pub morning_start: NaiveTime,
    pub morning_end: NaiveTime,
    pub afternoon_start: NaiveTime,
    pub afternoon_end: NaiveTime,
    pub slot_duration_minutes: i32,
}

impl Default for WorkingHoursPolicy {
    fn default() -> Self {
        Self {
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            morning_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            morning_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            afternoon_start: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            afternoon_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            slot_duration_minutes: 30,
        }
    }
}

impl WorkingHoursPolicy {
    /// Working windows for a weekday, morning before afternoon.
    /// Non-working days yield no windows.
    pub fn windows_for(&self, weekday: Weekday) -> Vec<(NaiveTime, NaiveTime)> {
        if !self.working_days.contains(&weekday) {
            return vec![];
        }

        vec![
            (self.morning_start, self.morning_end),
            (self.afternoon_start, self.afternoon_end),
        ]
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_duration_minutes as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_day_has_morning_and_afternoon_windows() {
        let policy = WorkingHoursPolicy::default();

        let windows = policy.windows_for(Weekday::Mon);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].0, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(windows[0].1, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(windows[1].0, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(windows[1].1, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn weekend_has_no_windows() {
        let policy = WorkingHoursPolicy::default();

        assert!(policy.windows_for(Weekday::Sat).is_empty());
        assert!(policy.windows_for(Weekday::Sun).is_empty());
    }
}
