//! Daily fire time of the update job.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::errors::ValidationError;
use cotizaciones_market_data::ARGENTINA_TZ;

pub const UPDATE_JOB_ID: &str = "update_daily";

/// Fires once a day at a fixed local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    time: NaiveTime,
    tz: Tz,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32, tz: Tz) -> Result<Self, ValidationError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            ValidationError::InvalidInput(format!("Invalid update time {:02}:{:02}", hour, minute))
        })?;
        Ok(Self { time, tz })
    }

    /// Parses `HH:MM` as a time in Buenos Aires.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let time = NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| {
            ValidationError::InvalidInput(format!("Invalid update time '{}', expected HH:MM", input))
        })?;
        Ok(Self {
            time,
            tz: ARGENTINA_TZ,
        })
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Standard five-field cron expression for the fire time.
    pub fn cron_expression(&self) -> String {
        format!("{} {} * * *", self.minute(), self.hour())
    }

    /// Human-readable job name, e.g. "Update financial data at 4:10 PM Argentina time".
    pub fn job_name(&self) -> String {
        format!(
            "Update financial data at {} Argentina time",
            self.time.format("%-I:%M %p")
        )
    }

    /// First fire time strictly after `now`.
    pub fn next_fire_after<T: TimeZone>(&self, now: &DateTime<T>) -> DateTime<Tz> {
        let local_now = now.with_timezone(&self.tz);
        let today = local_now.date_naive();

        (0..=2u64)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter_map(|day| self.tz.from_local_datetime(&day.and_time(self.time)).earliest())
            .find(|candidate| *candidate > local_now)
            .unwrap_or_else(|| local_now + chrono::Duration::days(1))
    }
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            time: NaiveTime::from_hms_opt(16, 10, 0).unwrap_or_default(),
            tz: ARGENTINA_TZ,
        }
    }
}
