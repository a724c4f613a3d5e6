use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Format elapsed seconds as `HH:MM:SS`.
///
/// This converts a summed duration, not a calendar instant; hours grow
/// past 99 without rolling over.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a timestamp for table display as `YYYY-MM-DD HH:mm:ss`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse user date input: `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
///
/// A bare date means midnight UTC.
pub fn parse_timestamp_input(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    bail!("unrecognized date: {} (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_two_minutes() {
        assert_eq!(format_clock(120), "00:02:00");
    }

    #[test]
    fn test_format_clock_zero() {
        assert_eq!(format_clock(0), "00:00:00");
    }

    #[test]
    fn test_format_clock_hours_do_not_roll_over() {
        // 30 days worth of seconds; a calendar formatter would wrap.
        assert_eq!(format_clock(30 * 24 * 3600 + 61), "720:01:01");
    }

    #[test]
    fn test_format_timestamp() {
        let ts: DateTime<Utc> = "2024-01-02T03:04:05Z".parse().unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-02 03:04:05");
    }

    #[test]
    fn test_parse_bare_date() {
        let ts = parse_timestamp_input("2024-01-02").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-02 00:00:00");
    }

    #[test]
    fn test_parse_date_time() {
        let ts = parse_timestamp_input(" 2024-01-02 03:04:05 ").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-02 03:04:05");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp_input("yesterday").is_err());
        assert!(parse_timestamp_input("01/02/2024").is_err());
    }
}
