use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Group digits in threes: `1234567` -> `"1,234,567"`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 12-hour wall clock time, e.g. `3:04:05 PM`.
pub fn format_time_of_day<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-I:%M:%S %p").to_string()
}

/// Coarse relative age like "5 minutes ago". Future timestamps read "just now".
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = if secs < 3_600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3_600, "hour")
    } else {
        (secs / 86_400, "day")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
