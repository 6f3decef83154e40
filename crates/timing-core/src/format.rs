//! Timer text formatting.
//!
//! Seconds are clamped to zero, rounded once to whole milliseconds, and then
//! decomposed with integer division only. Adjacent frames therefore never
//! disagree by a rounding step.

use runtimer_run_model::style::TimeFormat;

/// Integer breakdown of a non-negative duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub total_millis: u64,
    pub hours: u64,
    /// Minutes within the hour.
    pub minutes: u64,
    /// Minutes including full hours.
    pub total_minutes: u64,
    pub seconds: u64,
    pub millis: u64,
    pub centis: u64,
}

impl TimeParts {
    /// Decompose `secs`, clamping negatives (and NaN) to zero.
    pub fn from_secs(secs: f64) -> Self {
        let total_millis = if secs.is_nan() || secs <= 0.0 {
            0
        } else {
            (secs * 1000.0).round() as u64
        };
        Self::from_millis(total_millis)
    }

    pub fn from_millis(total_millis: u64) -> Self {
        let total_secs = total_millis / 1000;
        let total_minutes = total_secs / 60;
        Self {
            total_millis,
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            total_minutes,
            seconds: total_secs % 60,
            millis: total_millis % 1000,
            centis: (total_millis / 10) % 100,
        }
    }
}

/// Render an elapsed time in the given layout.
pub fn format_time(secs: f64, format: TimeFormat) -> String {
    let t = TimeParts::from_secs(secs);
    match format {
        TimeFormat::HoursMillis => format!(
            "{}:{:02}:{:02}.{:03}",
            t.hours, t.minutes, t.seconds, t.millis
        ),
        TimeFormat::Hours => format!("{}:{:02}:{:02}", t.hours, t.minutes, t.seconds),
        TimeFormat::MinutesMillis => {
            format!("{}:{:02}.{:03}", t.total_minutes, t.seconds, t.millis)
        }
        TimeFormat::Minutes => format!("{}:{:02}", t.total_minutes, t.seconds),
        TimeFormat::MinutesCentis => {
            format!("{}:{:02}.{:02}", t.total_minutes, t.seconds, t.centis)
        }
        TimeFormat::PaddedMinutesCentis => {
            format!("{:02}:{:02}.{:02}", t.total_minutes, t.seconds, t.centis)
        }
        TimeFormat::SecondsMillis => format!("{}.{:03}", t.total_millis / 1000, t.millis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_value_in_every_format() {
        let secs = 3725.125;
        assert_eq!(format_time(secs, TimeFormat::HoursMillis), "1:02:05.125");
        assert_eq!(format_time(secs, TimeFormat::Hours), "1:02:05");
        assert_eq!(format_time(secs, TimeFormat::MinutesMillis), "62:05.125");
        assert_eq!(format_time(secs, TimeFormat::Minutes), "62:05");
        assert_eq!(format_time(secs, TimeFormat::MinutesCentis), "62:05.12");
        assert_eq!(format_time(secs, TimeFormat::PaddedMinutesCentis), "62:05.12");
        assert_eq!(format_time(secs, TimeFormat::SecondsMillis), "3725.125");
    }

    #[test]
    fn test_centiseconds_truncate_millis() {
        assert_eq!(format_time(65.004, TimeFormat::MinutesCentis), "1:05.00");
        assert_eq!(format_time(65.019, TimeFormat::MinutesCentis), "1:05.01");
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(format_time(-3.0, TimeFormat::Minutes), "0:00");
        assert_eq!(format_time(-0.5, TimeFormat::SecondsMillis), "0.000");
        assert_eq!(format_time(f64::NAN, TimeFormat::HoursMillis), "0:00:00.000");
    }

    #[test]
    fn test_padded_minutes() {
        assert_eq!(format_time(65.5, TimeFormat::PaddedMinutesCentis), "01:05.50");
        assert_eq!(format_time(65.5, TimeFormat::MinutesCentis), "1:05.50");
    }

    #[test]
    fn test_rounding_carries_into_seconds() {
        // 59.9996 rounds to 60.000, not 59.1000.
        assert_eq!(format_time(59.9996, TimeFormat::MinutesMillis), "1:00.000");
    }

    #[test]
    fn test_time_parts() {
        let parts = TimeParts::from_millis(3_725_125);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 2);
        assert_eq!(parts.total_minutes, 62);
        assert_eq!(parts.seconds, 5);
        assert_eq!(parts.millis, 125);
        assert_eq!(parts.centis, 12);
    }
}
