use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Timezone every "today" in this system is computed in.
pub const ARGENTINA_TZ: Tz = chrono_tz::America::Argentina::Buenos_Aires;

/// Current wall-clock time in Buenos Aires.
pub fn argentina_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&ARGENTINA_TZ)
}

/// Current calendar date in Buenos Aires.
pub fn argentina_today() -> NaiveDate {
    argentina_now().date_naive()
}
