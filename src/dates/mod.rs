// src/dates/mod.rs

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fmt, str::FromStr};
use tracing::debug;

pub mod display;

pub use display::{day_key, format_for_display, is_valid_date, last_n_days};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest instant a spreadsheet date can reach before the arithmetic stops making sense
/// (±100 000 000 days either side of 1970).
const MAX_ABS_MILLIS: f64 = 8.64e15;

static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})[-/]([0-9]{1,2})[-/]([0-9]{4})$").expect("day-first regex"));
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})$").expect("year-first regex"));

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    /// Plain numbers, including spreadsheet serial dates.
    Number(f64),
    Text(String),
    /// A date the reader already resolved to an absolute instant.
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Loose truthiness: blank text, zero, NaN and `Empty` are all "nothing there".
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
            CellValue::DateTime(_) => true,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Which calendar a resolved date-time cell is read in.
///
/// Serial numbers are always read in UTC. `Local` reads date-time cells in the
/// machine's calendar, so the same sheet day can differ by one from its serial
/// form near midnight; `Utc` makes both paths agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NativeDateBasis {
    #[default]
    Local,
    Utc,
}

impl NativeDateBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeDateBasis::Local => "local",
            NativeDateBasis::Utc => "utc",
        }
    }

    fn calendar_day(&self, instant: &DateTime<Utc>) -> NaiveDate {
        match self {
            NativeDateBasis::Local => instant.with_timezone(&Local).date_naive(),
            NativeDateBasis::Utc => instant.date_naive(),
        }
    }
}

impl FromStr for NativeDateBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(NativeDateBasis::Local),
            "utc" => Ok(NativeDateBasis::Utc),
            other => anyhow::bail!("unknown native date basis `{}` (expected local or utc)", other),
        }
    }
}

/// Turns whatever a spreadsheet hands us into a `YYYY-MM-DD` string.
///
/// Never fails: anything it cannot read becomes today's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer {
    basis: NativeDateBasis,
}

impl DateNormalizer {
    pub fn new(basis: NativeDateBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> NativeDateBasis {
        self.basis
    }

    /// Normalize against the current local date.
    pub fn normalize(&self, value: &CellValue) -> String {
        self.normalize_on(value, Local::now().date_naive())
    }

    /// Normalize with an explicit fallback day.
    pub fn normalize_on(&self, value: &CellValue, today: NaiveDate) -> String {
        let parsed = match value {
            CellValue::Number(serial) => from_serial(*serial).map(iso),
            CellValue::DateTime(instant) => Some(iso(self.basis.calendar_day(instant))),
            CellValue::Text(s) => from_delimited(s),
            CellValue::Empty | CellValue::Bool(_) => None,
        };

        parsed.unwrap_or_else(|| {
            debug!(value = ?value, fallback = %today, "unrecognized date cell");
            iso(today)
        })
    }
}

/// Convenience wrapper with the default (local) basis.
pub fn normalize(value: &CellValue) -> String {
    DateNormalizer::default().normalize(value)
}

/// Spreadsheet day 0.
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch")
}

/// Serial day count → calendar day, read in UTC.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    let millis = serial * MILLIS_PER_DAY;
    if !millis.is_finite() || millis.abs() > MAX_ABS_MILLIS {
        return None;
    }
    let epoch = serial_epoch().and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::milliseconds(millis.trunc() as i64))
        .map(|dt| dt.date())
}

/// `DD-MM-YYYY` / `DD/MM/YYYY` → `YYYY-MM-DD`, year-first input passes through.
///
/// Fields are copied as written (zero padded); no calendar check is made.
fn from_delimited(raw: &str) -> Option<String> {
    let cleaned = raw.trim();

    if let Some(caps) = DAY_FIRST.captures(cleaned) {
        return Some(format!("{}-{:0>2}-{:0>2}", &caps[3], &caps[2], &caps[1]));
    }
    if let Some(caps) = YEAR_FIRST.captures(cleaned) {
        return Some(format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]));
    }
    None
}

fn iso(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn norm(value: CellValue) -> String {
        DateNormalizer::default().normalize_on(&value, fallback())
    }

    #[test]
    fn serial_dates_count_from_1899_12_30() {
        assert_eq!(norm(CellValue::Number(0.0)), "1899-12-30");
        assert_eq!(norm(CellValue::Number(45.0)), "1900-02-13");
        assert_eq!(norm(CellValue::Number(45366.0)), "2024-03-15");
        assert_eq!(norm(CellValue::Number(45367.0)), "2024-03-16");
    }

    #[test]
    fn serial_time_of_day_does_not_change_the_day() {
        assert_eq!(norm(CellValue::Number(45366.99)), "2024-03-15");
        assert_eq!(norm(CellValue::Number(45366.5)), "2024-03-15");
    }

    #[test]
    fn serial_matches_epoch_plus_days_for_a_range() {
        let epoch = serial_epoch();
        for days in [1_i64, 59, 60, 61, 366, 10_000, 36_526, 44_927, 60_000] {
            let expected = (epoch + Duration::days(days)).format("%Y-%m-%d").to_string();
            assert_eq!(norm(CellValue::Number(days as f64)), expected, "serial {}", days);
        }
    }

    #[test]
    fn non_finite_serial_falls_back_to_today() {
        assert_eq!(norm(CellValue::Number(f64::NAN)), "2026-10-18");
        assert_eq!(norm(CellValue::Number(f64::INFINITY)), "2026-10-18");
        assert_eq!(norm(CellValue::Number(1e20)), "2026-10-18");
    }

    #[test]
    fn day_first_strings_keep_day_and_month() {
        assert_eq!(norm("15-03-2024".into()), "2024-03-15");
        assert_eq!(norm("15/03/2024".into()), "2024-03-15");
        assert_eq!(norm("03-04-2024".into()), "2024-04-03");
        assert_eq!(norm("5/1/2024".into()), "2024-01-05");
        assert_eq!(norm("  7-11-2023 ".into()), "2023-11-07");
    }

    #[test]
    fn year_first_strings_pass_through() {
        assert_eq!(norm("2024-03-15".into()), "2024-03-15");
        assert_eq!(norm("2024/3/5".into()), "2024-03-05");
    }

    #[test]
    fn malformed_strings_fall_back_to_today() {
        for bad in ["", "   ", "yesterday", "15-03-24", "2024-03", "15.03.2024", "1-2-3-4"] {
            assert_eq!(norm(bad.into()), "2026-10-18", "input {:?}", bad);
        }
        assert_eq!(norm(CellValue::Empty), "2026-10-18");
        assert_eq!(norm(CellValue::Bool(true)), "2026-10-18");
    }

    #[test]
    fn non_ascii_digits_are_not_dates() {
        for bad in ["१५-०३-२०२४", "٢٠٢٤-٠٣-١٥", "15-03-२०२४"] {
            assert_eq!(norm(bad.into()), "2026-10-18", "input {:?}", bad);
        }
    }

    #[test]
    fn native_dates_follow_the_selected_basis() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let utc = DateNormalizer::new(NativeDateBasis::Utc);
        assert_eq!(utc.normalize_on(&CellValue::DateTime(instant), fallback()), "2024-03-15");

        let local = DateNormalizer::new(NativeDateBasis::Local);
        let expected = instant.with_timezone(&Local).format("%Y-%m-%d").to_string();
        assert_eq!(local.normalize_on(&CellValue::DateTime(instant), fallback()), expected);
    }

    #[test]
    fn default_normalize_uses_local_today() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(normalize(&CellValue::Text("not a date".into())), today);
    }

    #[test]
    fn basis_parses_from_config_strings() {
        assert_eq!("UTC".parse::<NativeDateBasis>().unwrap(), NativeDateBasis::Utc);
        assert_eq!(" local ".parse::<NativeDateBasis>().unwrap(), NativeDateBasis::Local);
        assert!("gmt".parse::<NativeDateBasis>().is_err());
    }
}
