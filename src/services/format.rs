//! Display helpers shared by the chat and history views.

use chrono::{DateTime, Local, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 604_800_000;

/// Relative time for the chat sidebar and message stamps.
///
/// Buckets: under a minute, minutes, hours, then the calendar date.
pub fn format_chat_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - ts).num_milliseconds();
    if diff < MINUTE_MS {
        "just now".to_string()
    } else if diff < HOUR_MS {
        units_ago(diff / MINUTE_MS, "minute")
    } else if diff < DAY_MS {
        units_ago(diff / HOUR_MS, "hour")
    } else {
        format_calendar_date(ts)
    }
}

/// Relative time for history cards. Adds a day tier under one week.
pub fn format_list_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - ts).num_milliseconds();
    if diff < DAY_MS {
        format_chat_time(ts, now)
    } else if diff < WEEK_MS {
        units_ago(diff / DAY_MS, "day")
    } else {
        format_calendar_date(ts)
    }
}

fn units_ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Numeric local date, e.g. `2024/1/5`.
pub fn format_calendar_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y/%-m/%-d").to_string()
}

/// Long local date for card footers, e.g. `Jan 5, 2024`.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// Message body as label markup: one rendered line per source line.
///
/// Content comes from the user or the server and is not escaped.
pub fn format_message_content(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn format_message_count(count: u32) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}

/// Escape text for inclusion in Pango markup.
pub fn escape_markup(text: &str) -> String {
    glib::markup_escape_text(text).to_string()
}
