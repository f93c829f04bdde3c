//! `yyyy-mm-dd` dates as they travel through JSON payloads and CSV.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:T.*)?$").expect("iso date regex is valid")
    })
}

/// Parses `yyyy-mm-dd`, ignoring an optional `T...` time suffix.
///
/// Returns `None` for anything else, including impossible calendar
/// dates such as `2023-02-30`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let captures = iso_date_regex().captures(s.trim())?;
    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
