use time::{Date, OffsetDateTime, UtcOffset};

/// Current calendar date at the given UTC offset (hours).
pub fn today(utc_offset_hours: i8) -> Date {
    let offset = UtcOffset::from_hms(utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

pub fn days(n: i64) -> time::Duration {
    time::Duration::days(n)
}

/// Moves `date` by `n` days, clamped to the calendar `time` can represent.
pub fn shift(date: Date, n: i64) -> Date {
    date.checked_add(days(n))
        .unwrap_or(if n < 0 { Date::MIN } else { Date::MAX })
}
