//! Display formatting for dashboard figures.
//!
//! All functions are pure so panels and console commands format numbers
//! the same way.

use chrono::NaiveDateTime;

/// Group digits by thousands with a space, French style: `85 600`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Signed delta with thousands grouping: `+1 250`, `-312`, `0`.
pub fn format_signed(value: i64) -> String {
    let grouped = format_count(value.unsigned_abs());
    match value.signum() {
        1 => format!("+{grouped}"),
        -1 => format!("-{grouped}"),
        _ => grouped,
    }
}

/// Format a share as `"12.3%"`, or `"--%"` when undefined.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        "--%".into()
    } else {
        format!("{:.1}%", value)
    }
}

/// French ordinal used for the island ranking.
pub fn format_rank(rank: u8) -> String {
    match rank {
        1 => "1ère".into(),
        n => format!("{n}ème"),
    }
}

/// Relative age of a feed message: `"Maintenant"`, `"7 min"`, `"2 h"`.
pub fn format_age(posted_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - posted_at).num_minutes();
    if minutes < 1 {
        "Maintenant".into()
    } else if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h", minutes / 60)
    }
}

/// Format a duration in seconds as `HH:MM:SS`.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, s)
}
