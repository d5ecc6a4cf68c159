use chrono::{DateTime, Duration, Utc};

/// Views are bucketed by calendar day in a fixed UTC+7 offset.
pub const VIEW_DATE_OFFSET_HOURS: i64 = 7;

/// Calendar day (`YYYY-MM-DD`) an instant belongs to.
pub fn view_date(now: DateTime<Utc>) -> String {
    (now + Duration::hours(VIEW_DATE_OFFSET_HOURS))
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// First day of a window of `days` days ending with the day of `now`.
pub fn window_start(now: DateTime<Utc>, days: u32) -> String {
    let back = i64::from(days.max(1)) - 1;
    view_date(now - Duration::days(back))
}
