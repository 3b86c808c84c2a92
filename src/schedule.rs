use chrono::{Days, Months, NaiveDateTime, NaiveTime};

/// Watering frequencies a plant can be configured with. Values outside this
/// list are accepted by the API but never produce a next-watering date.
pub const WATERING_FREQUENCIES: [&str; 6] = [
    "Daily",
    "Every 2-3 days",
    "Weekly",
    "Bi-weekly",
    "Monthly",
    "As needed",
];

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Compute the next watering date from a plant's configured frequency and
/// the moment it was watered.
///
/// Month arithmetic is calendar-based: `chrono::Months` clamps month-end
/// dates to the last day of the target month (Jan 31 -> Feb 28/29).
/// `As needed`, unset and unrecognized frequencies yield `None`.
pub fn advance_schedule(
    frequency: Option<&str>,
    watered_at: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match frequency {
        Some("Daily") => watered_at.checked_add_days(Days::new(1)),
        Some("Every 2-3 days") => watered_at.checked_add_days(Days::new(3)),
        Some("Weekly") => watered_at.checked_add_days(Days::new(7)),
        Some("Bi-weekly") => watered_at.checked_add_days(Days::new(14)),
        Some("Monthly") => watered_at.checked_add_months(Months::new(1)),
        _ => None,
    }
}

/// Whole days until the next watering, counted from the start of `now`'s
/// calendar day. Negative means overdue, zero means due today, `None` means
/// no watering is scheduled.
///
/// Recomputed on every read; this value is never stored.
pub fn days_until_watering(
    next_watering: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<i64> {
    let next = next_watering?;
    let today = now.date().and_time(NaiveTime::MIN);
    let secs = (next - today).num_seconds();
    // ceiling division on whole days
    Some((secs + SECS_PER_DAY - 1).div_euclid(SECS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn fixed_offsets_match_frequency_table() {
        let watered = at(2026, 3, 10, 9);
        assert_eq!(advance_schedule(Some("Daily"), watered), Some(at(2026, 3, 11, 9)));
        assert_eq!(
            advance_schedule(Some("Every 2-3 days"), watered),
            Some(at(2026, 3, 13, 9))
        );
        assert_eq!(advance_schedule(Some("Weekly"), watered), Some(at(2026, 3, 17, 9)));
        assert_eq!(
            advance_schedule(Some("Bi-weekly"), watered),
            Some(at(2026, 3, 24, 9))
        );
        assert_eq!(advance_schedule(Some("Monthly"), watered), Some(at(2026, 4, 10, 9)));
    }

    #[test]
    fn monthly_clamps_at_month_end() {
        assert_eq!(
            advance_schedule(Some("Monthly"), at(2026, 1, 31, 8)),
            Some(at(2026, 2, 28, 8))
        );
        // leap year
        assert_eq!(
            advance_schedule(Some("Monthly"), at(2028, 1, 31, 8)),
            Some(at(2028, 2, 29, 8))
        );
    }

    #[test]
    fn unrecognized_frequencies_yield_none() {
        let watered = at(2026, 3, 10, 9);
        assert_eq!(advance_schedule(Some("As needed"), watered), None);
        assert_eq!(advance_schedule(Some("Hourly"), watered), None);
        assert_eq!(advance_schedule(Some(""), watered), None);
        assert_eq!(advance_schedule(None, watered), None);
    }

    #[test]
    fn advance_is_deterministic() {
        let watered = at(2026, 6, 1, 14);
        assert_eq!(
            advance_schedule(Some("Weekly"), watered),
            advance_schedule(Some("Weekly"), watered)
        );
    }

    #[test]
    fn days_until_none_without_schedule() {
        assert_eq!(days_until_watering(None, at(2026, 3, 10, 9)), None);
    }

    #[test]
    fn days_until_zero_at_start_of_day() {
        let now = at(2026, 3, 10, 15);
        assert_eq!(days_until_watering(Some(at(2026, 3, 10, 0)), now), Some(0));
    }

    #[test]
    fn days_until_rounds_partial_days_up() {
        let now = at(2026, 3, 10, 15);
        // later today still counts as one day out from midnight
        assert_eq!(days_until_watering(Some(at(2026, 3, 10, 18)), now), Some(1));
        assert_eq!(days_until_watering(Some(at(2026, 3, 17, 0)), now), Some(7));
    }

    #[test]
    fn days_until_negative_when_overdue() {
        let now = at(2026, 3, 10, 9);
        assert_eq!(days_until_watering(Some(at(2026, 3, 9, 0)), now), Some(-1));
        assert!(days_until_watering(Some(at(2026, 3, 7, 12)), now).unwrap() < 0);
    }
}
