//! `H:MM:SS` rendering of downtime intervals

use chrono::{DateTime, TimeZone};

/// Elapsed time from `start` to `end` as `H:MM:SS`, truncated to whole seconds.
///
/// Hours are not wrapped at 24. A negative interval (clock moved backwards)
/// renders as `0:00:00`.
pub fn format_duration<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String {
    let secs = end.clone().signed_duration_since(start.clone()).num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_zero_interval() {
        let t = Local::now();
        assert_eq!(format_duration(&t, &t), "0:00:00");
    }

    #[test]
    fn test_minutes_and_seconds() {
        let t = Local::now();
        assert_eq!(format_duration(&t, &(t + Duration::seconds(90))), "0:01:30");
        assert_eq!(format_duration(&t, &(t + Duration::seconds(3661))), "1:01:01");
    }

    #[test]
    fn test_hours_not_wrapped() {
        let t = Local::now();
        assert_eq!(format_duration(&t, &(t + Duration::hours(25))), "25:00:00");
    }

    #[test]
    fn test_sub_second_truncated() {
        let t = Local::now();
        let end = t + Duration::milliseconds(59_999);
        assert_eq!(format_duration(&t, &end), "0:00:59");
    }

    #[test]
    fn test_backwards_clock_clamps_to_zero() {
        let t = Local::now();
        assert_eq!(format_duration(&t, &(t - Duration::seconds(5))), "0:00:00");
    }
}
