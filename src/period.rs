//! Calendar periods attached to report tables.
//!
//! A [`Period`] is what a report was computed for: a single day, week,
//! month or year, or an arbitrary inclusive date range. Tables carry their
//! period in metadata so that comparison rows can be labeled with a
//! human-readable string and so that follow-up fetches can ask for exactly
//! the same dates.

use crate::{CompareError, Result};
use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Granularity of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
    Range,
}

impl PeriodKind {
    /// Request-parameter spelling (`day`, `week`, ...).
    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
            PeriodKind::Range => "range",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(PeriodKind::Day),
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "year" => Ok(PeriodKind::Year),
            "range" => Ok(PeriodKind::Range),
            other => Err(
                CompareError::InvalidPeriod(format!("unknown period type '{}'", other)).into(),
            ),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An inclusive calendar interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    kind: PeriodKind,
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            kind: PeriodKind::Day,
            start: date,
            end: date,
        }
    }

    /// The Monday-to-Sunday week containing `date`.
    pub fn week(date: NaiveDate) -> Self {
        let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
        let start = date.checked_sub_days(offset).unwrap_or(date);
        Self {
            kind: PeriodKind::Week,
            start,
            end: start.checked_add_days(Days::new(6)).unwrap_or(start),
        }
    }

    pub fn month(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(start);
        Self {
            kind: PeriodKind::Month,
            start,
            end,
        }
    }

    pub fn year(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self {
            kind: PeriodKind::Year,
            start,
            end,
        }
    }

    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CompareError::InvalidPeriod(format!(
                "range end {} is before start {}",
                end.format(DATE_FORMAT),
                start.format(DATE_FORMAT)
            ))
            .into());
        }
        Ok(Self {
            kind: PeriodKind::Range,
            start,
            end,
        })
    }

    /// Build the period of `kind` that contains `date`. Ranges need both
    /// ends and are built with [`Period::range`].
    pub fn containing(kind: PeriodKind, date: NaiveDate) -> Result<Self> {
        match kind {
            PeriodKind::Day => Ok(Self::day(date)),
            PeriodKind::Week => Ok(Self::week(date)),
            PeriodKind::Month => Ok(Self::month(date)),
            PeriodKind::Year => Ok(Self::year(date)),
            PeriodKind::Range => Self::range(date, date),
        }
    }

    /// Resolve a `period`/`date` request pair into a single period.
    ///
    /// `today` anchors relative expressions. Multi-period expressions such as
    /// `period=day&date=last7` describe a collection of periods and are
    /// rejected here; see [`Period::is_multiple_period`].
    pub fn from_request(period: &str, date: &str, today: NaiveDate) -> Result<Self> {
        let kind = PeriodKind::parse(period)?;
        if kind == PeriodKind::Range {
            let (start, end) = parse_range_expression(date, today)?;
            return Self::range(start, end);
        }
        if Self::is_multiple_period(date, period) {
            return Err(CompareError::InvalidPeriod(format!(
                "'{}' spans several {} periods",
                date, kind
            ))
            .into());
        }
        Self::containing(kind, parse_date(date, today)?)
    }

    /// Whether `date` denotes several periods of type `period`, i.e. the
    /// report engine would answer with a collection of tables rather than
    /// one table.
    pub fn is_multiple_period(date: &str, period: &str) -> bool {
        period != PeriodKind::Range.label()
            && (last_n_regex().is_match(date) || date_range_regex().is_match(date))
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// Request-parameter spelling of the period type.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn date_start(&self) -> NaiveDate {
        self.start
    }

    pub fn date_end(&self) -> NaiveDate {
        self.end
    }

    /// `start,end` form accepted by `period=range`.
    pub fn range_string(&self) -> String {
        format!(
            "{},{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }

    /// Human-facing label used on synthesized comparison rows.
    pub fn pretty_string(&self) -> String {
        match self.kind {
            PeriodKind::Day => self.start.format(DATE_FORMAT).to_string(),
            PeriodKind::Week => format!(
                "week {} to {}",
                self.start.format(DATE_FORMAT),
                self.end.format(DATE_FORMAT)
            ),
            PeriodKind::Month => self.start.format("%Y-%m").to_string(),
            PeriodKind::Year => self.start.format("%Y").to_string(),
            PeriodKind::Range => format!(
                "From {} to {}",
                self.start.format(DATE_FORMAT),
                self.end.format(DATE_FORMAT)
            ),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_string())
    }
}

fn last_n_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(last|previous)([0-9]*)$").expect("valid regex"))
}

fn date_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}),(\d{4}-\d{2}-\d{2}|today|now|yesterday)$")
            .expect("valid regex")
    })
}

fn parse_date(value: &str, today: NaiveDate) -> Result<NaiveDate> {
    match value.trim() {
        "today" | "now" => Ok(today),
        "yesterday" => days_before(today, 1, value),
        other => NaiveDate::parse_from_str(other, DATE_FORMAT).map_err(|e| {
            CompareError::InvalidPeriod(format!("invalid date '{}': {}", other, e)).into()
        }),
    }
}

fn days_before(date: NaiveDate, days: u64, value: &str) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days)).ok_or_else(|| {
        CompareError::InvalidPeriod(format!("'{}' is outside the supported date range", value))
            .into()
    })
}

fn parse_range_expression(value: &str, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(caps) = last_n_regex().captures(value) {
        let count: u64 = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|n| !n.is_empty())
            .map(str::parse::<u64>)
            .transpose()
            .map_err(|e| {
                CompareError::InvalidPeriod(format!("invalid count in '{}': {}", value, e))
            })?
            .unwrap_or(1)
            .max(1);
        let end = if &caps[1] == "previous" {
            days_before(today, 1, value)?
        } else {
            today
        };
        return Ok((days_before(end, count - 1, value)?, end));
    }

    match value.split_once(',') {
        Some((start, end)) => Ok((parse_date(start, today)?, parse_date(end, today)?)),
        None => Err(CompareError::InvalidPeriod(format!(
            "range expects 'start,end' or lastN, got '{}'",
            value
        ))
        .into()),
    }
}
