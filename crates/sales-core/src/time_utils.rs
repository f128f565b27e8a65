use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SalesError};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|e| {
        warn!("could not detect the system timezone ({}), using UTC", e);
        "UTC".to_string()
    })
}

/// Parse a recognised IANA timezone identifier.
pub fn parse_timezone(tz_name: &str) -> Result<Tz> {
    tz_name
        .trim()
        .parse::<Tz>()
        .map_err(|_| SalesError::InvalidTimezone(tz_name.to_string()))
}

/// Today's calendar date as seen from `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SalesError::InvalidDate(s.to_string()))
}

// ── Period ────────────────────────────────────────────────────────────────────

/// Calendar span used to bucket daily records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    /// Heading used for tabs and report sections.
    pub fn title(self) -> &'static str {
        match self {
            Period::Week => "Weekly",
            Period::Month => "Monthly",
            Period::Year => "Yearly",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        })
    }
}

/// First day of the calendar week.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        })
    }
}

// ── Period boundaries ─────────────────────────────────────────────────────────

/// First day of the `period` containing `date`.
pub fn start_of(date: NaiveDate, period: Period, week_start: WeekStart) -> NaiveDate {
    match period {
        Period::Week => {
            let offset = match week_start {
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
                WeekStart::Monday => date.weekday().num_days_from_monday(),
            };
            date - Days::new(u64::from(offset))
        }
        Period::Month => date - Days::new(u64::from(date.day0())),
        Period::Year => date - Days::new(u64::from(date.ordinal0())),
    }
}

/// Last day (inclusive) of the `period` containing `date`.
pub fn end_of(date: NaiveDate, period: Period, week_start: WeekStart) -> NaiveDate {
    let start = start_of(date, period, week_start);
    match period {
        Period::Week => start + Days::new(6),
        Period::Month => start + Months::new(1) - Days::new(1),
        Period::Year => start + Months::new(12) - Days::new(1),
    }
}

/// `date` moved back by one `period`.
///
/// Month and year steps clamp the day to the end of shorter months, so
/// 31 March steps back to 28/29 February. Returns `None` only at the edge of
/// the representable date range.
pub fn step_back(date: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Week => date.checked_sub_days(Days::new(7)),
        Period::Month => date.checked_sub_months(Months::new(1)),
        Period::Year => date.checked_sub_months(Months::new(12)),
    }
}

/// `true` when `date` lies in `[start, end]`.
pub fn is_between_inclusive(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Short identifier for the period beginning at `period_start`.
///
/// Weeks are shown as `D/MM/YYYY`, months as `MM/YYYY` and years as `YYYY`.
pub fn period_label(period: Period, period_start: NaiveDate) -> String {
    match period {
        Period::Week => period_start.format("%-d/%m/%Y").to_string(),
        Period::Month => period_start.format("%m/%Y").to_string(),
        Period::Year => period_start.format("%Y").to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
