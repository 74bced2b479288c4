use chrono::{TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartDateFormat {
    DayMonthTime, // 12 Jan 10:30
    HourMin,      // 10:30
    HourMinSec,   // 10:30:15
}

/// Determines the best format for timestamps within a span (in milliseconds).
pub fn determine_date_format(span_ms: i64) -> SmartDateFormat {
    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;

    if span_ms > 20 * HOUR {
        SmartDateFormat::DayMonthTime
    } else if span_ms >= MINUTE {
        SmartDateFormat::HourMin
    } else {
        SmartDateFormat::HourMinSec
    }
}

/// Formats an epoch-millisecond timestamp in UTC.
pub fn format_timestamp(timestamp_ms: i64, format: SmartDateFormat) -> String {
    let dt = match Utc.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(d) => d,
        chrono::LocalResult::Ambiguous(d, _) => d,
        chrono::LocalResult::None => return timestamp_ms.to_string(),
    };

    match format {
        SmartDateFormat::DayMonthTime => dt.format("%d %b %H:%M").to_string(),
        SmartDateFormat::HourMin => dt.format("%H:%M").to_string(),
        SmartDateFormat::HourMinSec => dt.format("%H:%M:%S").to_string(),
    }
}

/// "10:00 - 10:06" style label for a time range.
pub fn format_range(start_ms: i64, end_ms: i64) -> String {
    let format = determine_date_format(end_ms - start_ms);
    format!(
        "{} - {}",
        format_timestamp(start_ms, format),
        format_timestamp(end_ms, format)
    )
}
