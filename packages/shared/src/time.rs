use chrono::{DateTime, Local, TimeZone, Utc};

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current local wall-clock time as shown next to chat lines, e.g. `09:41 PM`.
pub fn format_clock_time() -> String {
    format_clock(&Local::now())
}

/// Format any zoned datetime as two-digit hour and minute with an AM/PM marker.
pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%I:%M %p").to_string()
}
