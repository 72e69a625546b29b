// src/report/range.rs

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use std::{fmt, str::FromStr};

use crate::api::ListQuery;

/// Reporting period, resolved against a given "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportRange {
    Today,
    #[default]
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
    /// Both bounds inclusive. Missing either bound falls back to the last 7 days.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// Inclusive `YYYY-MM-DD` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn query(&self) -> ListQuery {
        ListQuery::between(
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

impl ReportRange {
    pub fn resolve(&self, today: NaiveDate) -> DateSpan {
        let (start, end) = match *self {
            ReportRange::Today => (today, today),
            ReportRange::Last7Days => (today - Duration::days(7), today),
            ReportRange::Last30Days => (today - Duration::days(30), today),
            ReportRange::ThisMonth => (today.with_day(1).unwrap_or(today), today),
            ReportRange::LastMonth => {
                let first_this = today.with_day(1).unwrap_or(today);
                let last_prev = first_this.pred_opt().unwrap_or(first_this);
                (last_prev.with_day(1).unwrap_or(last_prev), last_prev)
            }
            ReportRange::Custom {
                start: Some(s),
                end: Some(e),
            } => (s, e),
            ReportRange::Custom { .. } => return ReportRange::Last7Days.resolve(today),
        };
        DateSpan { start, end }
    }

    pub fn label(&self) -> String {
        match self {
            ReportRange::Today => "today".into(),
            ReportRange::Last7Days => "last7days".into(),
            ReportRange::Last30Days => "last30days".into(),
            ReportRange::ThisMonth => "thisMonth".into(),
            ReportRange::LastMonth => "lastMonth".into(),
            ReportRange::Custom {
                start: Some(s),
                end: Some(e),
            } => format!("{} to {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
            ReportRange::Custom { .. } => "custom".into(),
        }
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ReportRange {
    type Err = anyhow::Error;

    /// Preset names, or `START..END` for a custom range.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((a, b)) = s.split_once("..") {
            let parse = |v: &str| {
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                    .with_context(|| format!("invalid date `{}`", v))
            };
            return Ok(ReportRange::Custom {
                start: Some(parse(a)?),
                end: Some(parse(b)?),
            });
        }
        match s.to_lowercase().as_str() {
            "today" => Ok(ReportRange::Today),
            "last7days" | "7d" => Ok(ReportRange::Last7Days),
            "last30days" | "30d" => Ok(ReportRange::Last30Days),
            "thismonth" => Ok(ReportRange::ThisMonth),
            "lastmonth" => Ok(ReportRange::LastMonth),
            "custom" => Ok(ReportRange::Custom {
                start: None,
                end: None,
            }),
            other => anyhow::bail!("unknown report range `{}`", other),
        }
    }
}
