//! Forward projection of a stored series.
//!
//! Consumers expect the served series to extend well into the future, with a
//! placeholder value on every day after the last real one.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::dates::{format_canonical, parse_quote_date};
use super::model::{SeriesEntry, SeriesPoint};
use crate::errors::DateFormatError;

/// Years are projected as 365 days; leap days are not added.
pub const DAYS_PER_PROJECTED_YEAR: u64 = 365;

pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

/// Longer horizons are clamped to this many years.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Value carried by every projected point.
pub const PROJECTION_SENTINEL: Decimal = Decimal::ONE;

/// Appends `years * 365` placeholder days after the last real entry.
///
/// `years` is clamped to [`MAX_PROJECTION_YEARS`]. Real entries are returned unchanged and in input order, duplicates
/// included. Only the last entry's date is parsed; an unparseable last date
/// fails the whole projection.
pub fn project(real: Vec<SeriesEntry>, years: u32) -> Result<Vec<SeriesPoint>, DateFormatError> {
    let last_date = match real.last() {
        Some(last) => parse_quote_date(&last.date)?,
        None => return Ok(Vec::new()),
    };

    let horizon = u64::from(years.min(MAX_PROJECTION_YEARS)) * DAYS_PER_PROJECTED_YEAR;
    let mut points: Vec<SeriesPoint> = Vec::with_capacity(real.len() + horizon as usize);
    points.extend(real.into_iter().map(SeriesPoint::from));
    points.extend(projected_days(last_date, horizon).map(|date| {
        SeriesPoint::projected(format_canonical(date), PROJECTION_SENTINEL)
    }));
    Ok(points)
}

fn projected_days(last: NaiveDate, horizon: u64) -> impl Iterator<Item = NaiveDate> {
    (1..=horizon).map_while(move |offset| last.checked_add_days(Days::new(offset)))
}

/// Projection settings shared by the read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesProjector {
    years: u32,
}

impl SeriesProjector {
    pub fn new(years: u32) -> Self {
        Self { years }
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn project(&self, real: Vec<SeriesEntry>) -> Result<Vec<SeriesPoint>, DateFormatError> {
        project(real, self.years)
    }
}

impl Default for SeriesProjector {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECTION_YEARS)
    }
}
