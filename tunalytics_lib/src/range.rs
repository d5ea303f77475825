//! Time-window filter: resolves range tokens to concrete `[start, end)`
//! intervals and narrows record sets to them.
//!
//! The token vocabulary (`day`, `week`, `month`, `year`, `all`, `7d`, `30d`,
//! `90d`) is part of the public contract. Unknown tokens are rejected with
//! [`AnalyticsError::InvalidRange`]; nothing silently falls back to a default.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::record::Timestamped;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Lookback used for `all`. A fixed fallback, not protocol inception.
const ALL_LOOKBACK_MONTHS: u32 = 5 * 12;

/// A named lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeRange {
    /// Every recognized token, in display order.
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Year,
        TimeRange::All,
        TimeRange::Last7Days,
        TimeRange::Last30Days,
        TimeRange::Last90Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
            TimeRange::All => "all",
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
        }
    }

    /// Fixed-length lookback in days. `None` for `all`, which is calendar based.
    fn lookback_days(&self) -> Option<i64> {
        match self {
            TimeRange::Day => Some(1),
            TimeRange::Week | TimeRange::Last7Days => Some(7),
            TimeRange::Month | TimeRange::Last30Days => Some(30),
            TimeRange::Last90Days => Some(90),
            TimeRange::Year => Some(365),
            TimeRange::All => None,
        }
    }

    /// Resolves this token against `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
        let start = match self.lookback_days() {
            Some(days) => now - Duration::days(days),
            None => now
                .checked_sub_months(Months::new(ALL_LOOKBACK_MONTHS))
                .unwrap_or_else(|| now - Duration::days(5 * 365 + 1)),
        };
        DateRange { start, end: now }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        TimeRange::ALL
            .into_iter()
            .find(|r| r.as_str() == token)
            .ok_or_else(|| AnalyticsError::InvalidRange(s.to_string()))
    }
}

/// A concrete half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    pub fn contains_millis(&self, timestamp: i64) -> bool {
        self.start_millis() <= timestamp && timestamp < self.end_millis()
    }

    /// The window with its start raised to `floor`. Empty if `floor` is at
    /// or past the end.
    pub fn clamp_start(&self, floor: DateTime<Utc>) -> DateRange {
        DateRange {
            start: self.start.max(floor).min(self.end),
            end: self.end,
        }
    }

    /// The last UTC date with any instant inside the window.
    pub fn last_day(&self) -> NaiveDate {
        (self.end - Duration::milliseconds(1)).date_naive()
    }

    /// Length of the requested window in whole days, rounding partial days up.
    ///
    /// This is the divisor for per-period averages, independent of how many
    /// days actually carried data.
    pub fn period_days(&self) -> usize {
        let span = self.end_millis() - self.start_millis();
        if span <= 0 {
            return 0;
        }
        ((span + DAY_MS - 1) / DAY_MS) as usize
    }
}

/// Resolves `range` against `now`: `end = now`, `start = now - lookback`.
pub fn resolve_range(range: TimeRange, now: DateTime<Utc>) -> DateRange {
    range.resolve(now)
}

/// Parses `token` and resolves it against `now`.
pub fn resolve_token(token: &str, now: DateTime<Utc>) -> Result<DateRange, AnalyticsError> {
    Ok(token.parse::<TimeRange>()?.resolve(now))
}

/// Keeps the items whose timestamp falls in `[range.start, range.end)`.
pub fn filter_by_range<T: Timestamped + Clone>(items: &[T], range: &DateRange) -> Vec<T> {
    items
        .iter()
        .filter(|item| range.contains_millis(item.timestamp_millis()))
        .cloned()
        .collect()
}
