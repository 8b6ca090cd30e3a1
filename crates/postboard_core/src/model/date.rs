//! Calendar date and time display formats.
//!
//! Posts carry human-readable dates (`June 15, 2025`) rather than timestamps;
//! calendar buckets are keyed by ISO dates (`2025-06-15`). This module is the
//! only place that knows either format.

use chrono::{Local, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical display format stored in `Post::date`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";
/// Format of calendar bucket grouping ids.
pub const GROUPING_DATE_FORMAT: &str = "%Y-%m-%d";

const DISPLAY_DATE_PARSE_FORMAT: &str = "%B %d, %Y";
const BUCKET_TITLE_FORMAT: &str = "%b %-d";
const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

static DISPLAY_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})\s*([AaPp][Mm])?$").expect("valid display time regex")
});

/// Parses a post display date such as `June 1, 2025`.
///
/// Surrounding whitespace is ignored; month names match case-insensitively.
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DISPLAY_DATE_PARSE_FORMAT).ok()
}

/// Formats a date in the canonical post display format.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parses a calendar bucket id such as `2025-06-15`.
pub fn parse_grouping_date(id: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(id.trim(), GROUPING_DATE_FORMAT).ok()
}

/// Returns the calendar bucket id for one day.
pub fn grouping_id_for(date: NaiveDate) -> String {
    date.format(GROUPING_DATE_FORMAT).to_string()
}

/// Returns the short bucket label for one day, e.g. `Jun 15`.
pub fn bucket_title(date: NaiveDate) -> String {
    date.format(BUCKET_TITLE_FORMAT).to_string()
}

/// Parses a display time such as `7:00 AM`, `12:30 pm` or `18:05`.
///
/// Stored times may carry trailing whitespace; it is ignored.
pub fn parse_display_time(value: &str) -> Option<NaiveTime> {
    let caps = DISPLAY_TIME_RE.captures(value.trim())?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let hour = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        None => hour,
        Some(meridiem) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            match (meridiem.as_str(), hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Formats a time of day as a display label, e.g. `7:05 PM`.
pub fn format_display_time(time: NaiveTime) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local time of day.
pub fn now_time() -> NaiveTime {
    Local::now().time()
}
