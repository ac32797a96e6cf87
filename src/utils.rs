use chrono::{Local, NaiveDate};

/// The default "today" for callers that want wall-clock behavior. Every
/// aggregator takes the reference day explicitly, so tests and replays can
/// pin it.
pub fn wall_clock_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days between a due date and the reference day. Positive when the
/// due date is in the past.
pub fn days_between(due: NaiveDate, today: NaiveDate) -> i64 {
    (today - due).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_between() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(days_between(due, today), 10);
        assert_eq!(days_between(today, today), 0);
        assert_eq!(days_between(today, due), -10);
    }

    #[test]
    fn test_wall_clock_today_is_stable_within_a_call() {
        let a = wall_clock_today();
        let b = wall_clock_today();
        assert!(b >= a);
    }
}
