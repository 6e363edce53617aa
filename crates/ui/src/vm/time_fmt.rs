use chrono::{DateTime, Utc};

/// `HH:MM` in UTC, shown under chat bubbles.
#[must_use]
pub fn format_clock_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

/// Backend dates arrive as ISO strings; show the date part only.
#[must_use]
pub fn format_backend_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.split('T').next().unwrap_or(value).to_owned(),
        None => "Not scheduled".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeblue_core::time::fixed_now;

    #[test]
    fn clock_time_is_hours_and_minutes() {
        assert_eq!(format_clock_time(fixed_now()), "12:00");
    }

    #[test]
    fn backend_dates_drop_the_time() {
        assert_eq!(format_backend_date(Some("2025-10-04T09:30:00")), "2025-10-04");
        assert_eq!(format_backend_date(Some("  ")), "Not scheduled");
        assert_eq!(format_backend_date(None), "Not scheduled");
    }
}
