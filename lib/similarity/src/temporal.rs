//! Date similarity measures

use crate::measure::Measure;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Dates further apart than this score 0 with `datesim`
pub const DATE_WINDOW_DAYS: f64 = 365.0;

/// Parse a date value. Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, RFC 3339
/// timestamps and bare years. A typed-literal suffix (`^^xsd:date`) is ignored.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.split("^^").next().unwrap_or(value).trim().trim_matches('"');

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(timestamp.date());
    }
    if value.len() == 4 {
        if let Ok(year) = value.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

/// Compare two date values with a date measure.
///
/// Returns `None` when `measure` is not a date measure; unparseable dates score 0.0.
pub fn date_similarity(a: &str, b: &str, measure: Measure) -> Option<f64> {
    if !matches!(measure, Measure::DateSim | Measure::DaySim | Measure::YearSim) {
        return None;
    }
    let (Some(a), Some(b)) = (parse_date(a), parse_date(b)) else {
        return Some(0.0);
    };

    let score = match measure {
        // linear decay over a one year window
        Measure::DateSim => {
            let days = (a - b).num_days().abs() as f64;
            (1.0 - days / DATE_WINDOW_DAYS).max(0.0)
        }
        Measure::DaySim => {
            let days = (a - b).num_days().abs() as f64;
            1.0 / (1.0 + days)
        }
        _ => {
            let years = (a.year() - b.year()).abs() as f64;
            1.0 / (1.0 + years)
        }
    };
    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(1999, 5, 1);
        assert_eq!(parse_date("1999-05-01"), expected);
        assert_eq!(parse_date("1999-05-01T10:30:00"), expected);
        assert_eq!(parse_date("1999-05-01T10:30:00+02:00"), expected);
        assert_eq!(parse_date("\"1999-05-01\"^^xsd:date"), expected);
        assert_eq!(parse_date("1999"), NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(parse_date("last tuesday"), None);
    }

    #[test]
    fn test_datesim() {
        assert_eq!(date_similarity("2020-01-01", "2020-01-01", Measure::DateSim), Some(1.0));
        let half = date_similarity("2020-01-01", "2020-07-02", Measure::DateSim).unwrap();
        assert!((half - (1.0 - 183.0 / 365.0)).abs() < 1e-9);
        assert_eq!(date_similarity("2000-01-01", "2020-01-01", Measure::DateSim), Some(0.0));
    }

    #[test]
    fn test_daysim_and_yearsim() {
        assert_eq!(date_similarity("2020-01-01", "2020-01-02", Measure::DaySim), Some(0.5));
        assert_eq!(date_similarity("2020-01-01", "2021-12-31", Measure::YearSim), Some(0.5));
    }

    #[test]
    fn test_unparseable_and_wrong_measure() {
        assert_eq!(date_similarity("soon", "2020-01-01", Measure::DateSim), Some(0.0));
        assert_eq!(date_similarity("2020-01-01", "2020-01-01", Measure::Jaro), None);
    }
}
