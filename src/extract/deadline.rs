//! Free-text application deadline parsing

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Parses a deadline as printed on a job posting
///
/// Accepts `dd.MM.yyyy`, `dd.<month>yyyy`, `dd.<month>.yyyy` and ISO
/// `yyyy-MM-dd`, ignoring whitespace and case. Month names may be Norwegian
/// or English, full or abbreviated. Returns None when nothing matches.
pub fn parse_deadline(text: &str) -> Option<NaiveDate> {
    parse_deadline_in_year(text, Local::now().year())
}

/// Like `parse_deadline`, with the year used for "Søk ..." texts given
pub(crate) fn parse_deadline_in_year(text: &str, current_year: i32) -> Option<NaiveDate> {
    let lowered = text.to_lowercase();

    // "Søk innen 12. mars" style: drop the lead-in and supply the year
    let lowered = if lowered.contains("søk") {
        let start = lowered.find(|c: char| c.is_ascii_digit())?;
        let rest = &lowered[start..];
        if year_regex().is_match(rest) {
            rest.to_string()
        } else {
            format!("{}{}", rest, current_year)
        }
    } else {
        lowered
    };

    let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(caps) = iso_regex().captures(&compact) {
        return date(&caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = numeric_regex().captures(&compact) {
        return date(&caps[3], &caps[2], &caps[1]);
    }

    if let Some(caps) = named_regex().captures(&compact) {
        let month = month_number(&caps[2])?;
        let day: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let number = match name {
        "januar" | "january" | "jan" => 1,
        "februar" | "february" | "feb" => 2,
        "mars" | "march" | "mar" => 3,
        "april" | "apr" => 4,
        "mai" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nov" => 11,
        "desember" | "december" | "des" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").expect("valid regex"))
}

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid regex"))
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").expect("valid regex"))
}

fn named_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})\.?([a-zæøå]+)\.?(\d{4})").expect("valid regex")
    })
}
