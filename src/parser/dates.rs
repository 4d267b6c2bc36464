//! Date heuristics shared by the parsers and by every view that compares
//! stored dates.
//!
//! Stored workout dates stay exactly as entered. Whenever one needs to
//! become a comparable calendar date (sorting, streaks, week grouping,
//! upload conversion) it goes through `parse_flexible` so the three-way
//! ordering disambiguation is applied identically everywhere.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

/// Split a date token on `-`, `/` or `.` into numeric parts.
fn numeric_parts(s: &str) -> Vec<u32> {
    s.split(['-', '/', '.'])
        .filter_map(|p| p.trim().parse::<u32>().ok())
        .collect()
}

/// Interpret a free-form 3-part numeric date.
///
/// - first part > 1000 → Year-Month-Day
/// - last part > 1000 → Day-Month-Year
/// - otherwise → Day-Month-(2000+YY)
pub fn parse_flexible(s: &str) -> Option<NaiveDate> {
    let parts = numeric_parts(s);
    if parts.len() != 3 {
        return None;
    }
    let (p1, p2, p3) = (parts[0], parts[1], parts[2]);
    if p1 > 1000 {
        NaiveDate::from_ymd_opt(p1 as i32, p2, p3)
    } else if p3 > 1000 {
        NaiveDate::from_ymd_opt(p3 as i32, p2, p1)
    } else {
        NaiveDate::from_ymd_opt(2000 + p3 as i32, p2, p1)
    }
}

/// Interpret a date token that may be missing its year (`DD-MM`, as plan
/// days carry). Three-part tokens defer to `parse_flexible`.
pub fn parse_with_fallback_year(s: &str, year: i32) -> Option<NaiveDate> {
    let parts = numeric_parts(s);
    match parts.len() {
        3 => parse_flexible(s),
        2 => NaiveDate::from_ymd_opt(year, parts[1], parts[0]),
        _ => None,
    }
}

/// Extract the first `D{1,2}[-/.]M{1,2}` token from a line.
pub fn extract_day_month(line: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r"(\d{1,2})[-/.](\d{1,2})").unwrap();
    let caps = re.captures(line)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    Some((day, month))
}

/// Zero-pad a raw `D-M` token to `DD-MM`. Tokens without a recognizable
/// day/month pair pass through unchanged.
pub fn zero_pad_day_month(raw: &str) -> String {
    match extract_day_month(raw) {
        Some((d, m)) => format!("{:02}-{:02}", d, m),
        None => raw.to_string(),
    }
}

/// Synthesize a weekly-plan id from the processing date.
/// Two plans imported the same calendar day share this id by design.
pub fn plan_id(today: NaiveDate) -> String {
    format!("week-{}", today.format("%Y-%m-%d"))
}

/// The Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Uppercase Spanish weekday name.
pub fn spanish_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "LUNES",
        Weekday::Tue => "MARTES",
        Weekday::Wed => "MIÉRCOLES",
        Weekday::Thu => "JUEVES",
        Weekday::Fri => "VIERNES",
        Weekday::Sat => "SÁBADO",
        Weekday::Sun => "DOMINGO",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_digit_year_branch() {
        assert_eq!(parse_flexible("05-06-07"), Some(date(2007, 6, 5)));
    }

    #[test]
    fn test_year_first_branch() {
        assert_eq!(parse_flexible("2007-06-05"), Some(date(2007, 6, 5)));
    }

    #[test]
    fn test_year_last_branch() {
        assert_eq!(parse_flexible("05-06-2007"), Some(date(2007, 6, 5)));
    }

    #[test]
    fn test_slash_and_dot_separators() {
        assert_eq!(parse_flexible("05/06/2007"), Some(date(2007, 6, 5)));
        assert_eq!(parse_flexible("05.06.2007"), Some(date(2007, 6, 5)));
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert_eq!(parse_flexible("32-01-2026"), None);
        assert_eq!(parse_flexible("no date"), None);
        assert_eq!(parse_flexible("12-2026"), None);
    }

    #[test]
    fn test_fallback_year_for_day_month() {
        assert_eq!(
            parse_with_fallback_year("20-1", 2026),
            Some(date(2026, 1, 20))
        );
        assert_eq!(
            parse_with_fallback_year("05-06-07", 2026),
            Some(date(2007, 6, 5))
        );
    }

    #[test]
    fn test_extract_day_month() {
        assert_eq!(extract_day_month("LUNES 12-1 — PIERNA"), Some((12, 1)));
        assert_eq!(extract_day_month("MARTES 5/11 - UPPER"), Some((5, 11)));
        assert_eq!(extract_day_month("sin fecha"), None);
    }

    #[test]
    fn test_zero_pad() {
        assert_eq!(zero_pad_day_month("20-1"), "20-01");
        assert_eq!(zero_pad_day_month("5/3"), "05-03");
        assert_eq!(zero_pad_day_month("???"), "???");
    }

    #[test]
    fn test_plan_id_format() {
        assert_eq!(plan_id(date(2026, 1, 20)), "week-2026-01-20");
    }

    #[test]
    fn test_monday_of() {
        // 2026-01-22 is a Thursday
        assert_eq!(monday_of(date(2026, 1, 22)), date(2026, 1, 19));
        // Sunday belongs to the preceding Monday
        assert_eq!(monday_of(date(2026, 1, 25)), date(2026, 1, 19));
        // Monday is its own anchor
        assert_eq!(monday_of(date(2026, 1, 19)), date(2026, 1, 19));
    }

    #[test]
    fn test_spanish_weekday() {
        assert_eq!(spanish_weekday(date(2026, 1, 19)), "LUNES");
        assert_eq!(spanish_weekday(date(2026, 1, 25)), "DOMINGO");
    }
}
