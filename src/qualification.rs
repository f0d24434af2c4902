//! Qualification rule for worm detection records.
//!
//! A part qualifies when the worm gap barely moved under load
//! (`distance_before - distance_after <= 0.02`) and the bonding had more
//! than three days to cure before the part went into service
//! (`using_time - combine_time > 72h`). Any missing input leaves the part
//! unqualified. A caller-supplied verdict always wins.

use chrono::NaiveDateTime;

/// Maximum allowed distance drop between the before/after measurements.
pub const DISTANCE_TOLERANCE: f64 = 0.02;

/// Minimum curing time, in hours, between bonding and putting into service.
/// The comparison is strict: exactly 72h does not qualify.
pub const MIN_CURING_HOURS: f64 = 72.0;

/// Absorbs binary noise so decimal inputs like 5.02 - 5.00 compare as 0.02.
const DISTANCE_EPSILON: f64 = 1e-9;

/// The record values the rule looks at, after an update has been merged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualificationInput {
    pub distance_before: Option<f64>,
    pub distance_after: Option<f64>,
    pub combine_time: Option<NaiveDateTime>,
    pub using_time: Option<NaiveDateTime>,
}

/// Decide whether a part is qualified.
///
/// `explicit` is the caller's own verdict; when present it is returned
/// verbatim and nothing is computed.
pub fn determine(input: &QualificationInput, explicit: Option<bool>) -> bool {
    if let Some(verdict) = explicit {
        return verdict;
    }
    distance_within_tolerance(input) && cured_long_enough(input)
}

/// `true` when both distances are known and the drop is within tolerance.
pub fn distance_within_tolerance(input: &QualificationInput) -> bool {
    match (input.distance_before, input.distance_after) {
        (Some(before), Some(after)) => before - after <= DISTANCE_TOLERANCE + DISTANCE_EPSILON,
        _ => false,
    }
}

/// `true` when both timestamps are known and strictly more than
/// [`MIN_CURING_HOURS`] separate them.
pub fn cured_long_enough(input: &QualificationInput) -> bool {
    match (input.combine_time, input.using_time) {
        (Some(combined), Some(used)) => elapsed_hours(combined, used) > MIN_CURING_HOURS,
        _ => false,
    }
}

/// Fractional hours from `from` to `to` (negative when `to` is earlier).
pub fn elapsed_hours(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

/// `distance_before - distance_after` rounded to two decimals, ties to even.
pub fn distance_result(distance_before: f64, distance_after: f64) -> f64 {
    ((distance_before - distance_after) * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn input(
        before: Option<f64>,
        after: Option<f64>,
        elapsed: Option<Duration>,
    ) -> QualificationInput {
        QualificationInput {
            distance_before: before,
            distance_after: after,
            combine_time: elapsed.map(|_| t0()),
            using_time: elapsed.map(|d| t0() + d),
        }
    }

    #[test]
    fn qualifies_small_drop_after_73_hours() {
        let i = input(Some(5.00), Some(4.99), Some(Duration::hours(73)));
        assert!(determine(&i, None));
    }

    #[test]
    fn rejects_small_drop_after_70_hours() {
        let i = input(Some(5.00), Some(4.99), Some(Duration::hours(70)));
        assert!(!determine(&i, None));
    }

    #[test]
    fn explicit_verdict_wins_both_ways() {
        let good = input(Some(5.00), Some(4.99), Some(Duration::hours(100)));
        let bad = input(Some(5.00), Some(3.00), None);
        assert!(!determine(&good, Some(false)));
        assert!(determine(&bad, Some(true)));
        assert!(determine(&QualificationInput::default(), Some(true)));
    }

    #[test]
    fn drop_of_exactly_tolerance_passes() {
        let exact = input(Some(0.02), Some(0.0), None);
        assert!(distance_within_tolerance(&exact));
        let decimal = input(Some(5.02), Some(5.00), None);
        assert!(distance_within_tolerance(&decimal));
    }

    #[test]
    fn drop_just_over_tolerance_fails() {
        let over = input(Some(0.0201), Some(0.0), None);
        assert!(!distance_within_tolerance(&over));
        let over = input(Some(5.0201), Some(5.0), Some(Duration::hours(80)));
        assert!(!determine(&over, None));
    }

    #[test]
    fn growth_counts_as_within_tolerance() {
        let grew = input(Some(4.90), Some(5.00), Some(Duration::hours(73)));
        assert!(determine(&grew, None));
    }

    #[test]
    fn exactly_72_hours_fails_time_check() {
        let i = input(Some(5.00), Some(4.99), Some(Duration::hours(72)));
        assert!(!cured_long_enough(&i));
        assert!(!determine(&i, None));
    }

    #[test]
    fn just_over_72_hours_passes_time_check() {
        // 72.01h = 72h 36s
        let i = input(
            Some(5.00),
            Some(4.99),
            Some(Duration::hours(72) + Duration::seconds(36)),
        );
        assert!(cured_long_enough(&i));
        assert!(determine(&i, None));
    }

    #[test]
    fn missing_distance_is_not_qualified() {
        let days = Some(Duration::hours(200));
        assert!(!determine(&input(None, Some(4.99), days), None));
        assert!(!determine(&input(Some(5.00), None, days), None));
        assert!(!determine(&input(None, None, days), None));
    }

    #[test]
    fn missing_time_is_not_qualified() {
        let mut i = input(Some(5.00), Some(4.99), Some(Duration::hours(100)));
        i.combine_time = None;
        assert!(!determine(&i, None));

        let mut i = input(Some(5.00), Some(4.99), Some(Duration::hours(100)));
        i.using_time = None;
        assert!(!determine(&i, None));
    }

    #[test]
    fn service_before_bonding_is_not_qualified() {
        let mut i = input(Some(5.00), Some(4.99), Some(Duration::hours(100)));
        std::mem::swap(&mut i.combine_time, &mut i.using_time);
        assert!(!determine(&i, None));
    }

    #[test]
    fn elapsed_hours_is_fractional() {
        let h = elapsed_hours(t0(), t0() + Duration::minutes(90));
        assert!((h - 1.5).abs() < 1e-12);
    }

    #[test]
    fn distance_result_rounds_to_two_decimals() {
        assert_eq!(distance_result(5.00, 4.99), 0.01);
        assert_eq!(distance_result(5.123, 5.0), 0.12);
        assert_eq!(distance_result(5.0, 5.127), -0.13);
        assert_eq!(distance_result(3.0, 3.0), 0.0);
    }
}
