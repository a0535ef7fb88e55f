use crate::models::TimeInterval;

/// A candidate interval is free iff it overlaps none of the existing ones.
///
/// Both the availability report and the booking path go through this
/// predicate; the overlap rule itself lives on `TimeInterval::overlaps`.
pub fn is_interval_free(candidate: &TimeInterval, existing: &[TimeInterval]) -> bool {
    !existing.iter().any(|interval| candidate.overlaps(interval))
}
