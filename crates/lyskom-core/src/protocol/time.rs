//! The nine-field timestamp record.
//!
//! ```text
//! 17 30 12 24 11 99 5 357 0
//! │  │  │  │  │  │  │ │   └ daylight saving in effect
//! │  │  │  │  │  │  │ └ day of year, 0-based
//! │  │  │  │  │  │  └ day of week, 0 = Sunday
//! │  │  │  │  │  └ years since 1900
//! │  │  │  │  └ month, 0 = January
//! │  │  │  └ day of month, 1-based
//! │  │  └ hours
//! │  └ minutes
//! └ seconds                                    = 1999-12-24 12:30:17
//! ```
//!
//! All conversions in this module assume UTC.  The server ignores the day of
//! week and day of year when it receives a time, but they are still sent in
//! position.

use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::protocol::codec::{encode_fields, read_uint, Decode, Encode};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;

const SECONDS_PER_DAY: i64 = 86_400;

/// A broken-down UTC time as carried on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Time {
    pub seconds: u32,
    pub minutes: u32,
    pub hours: u32,
    pub day: u32,
    /// 0 = January.
    pub month: u32,
    /// Years since 1900.
    pub year: u32,
    /// 0 = Sunday.
    pub day_of_week: u32,
    /// 0 = January 1st.
    pub day_of_year: u32,
    pub is_dst: bool,
}

impl Time {
    /// Breaks down a Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    ///
    /// Times before 1900 cannot be represented and clamp to year 0.
    pub fn from_epoch(epoch_seconds: i64) -> Self {
        let days = epoch_seconds.div_euclid(SECONDS_PER_DAY);
        let secs_of_day = epoch_seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let day_of_year = days - days_from_civil(year, 1, 1);
        // 1970-01-01 was a Thursday.
        let day_of_week = (days + 4).rem_euclid(7);

        Self {
            seconds: (secs_of_day % 60) as u32,
            minutes: (secs_of_day / 60 % 60) as u32,
            hours: (secs_of_day / 3600) as u32,
            day,
            month: month - 1,
            year: u32::try_from(year - 1900).unwrap_or(0),
            day_of_week: day_of_week as u32,
            day_of_year: day_of_year as u32,
            is_dst: false,
        }
    }

    /// The current time, from the system clock.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::from_epoch(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Converts back to a Unix timestamp.  Day of week, day of year and the
    /// DST flag do not take part.
    pub fn to_epoch(&self) -> i64 {
        let days = days_from_civil(self.full_year(), self.calendar_month(), self.day);
        days * SECONDS_PER_DAY
            + i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds)
    }

    /// Formats as `YYYY-MM-DD hh:mm:ss`.
    pub fn to_date_and_time(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.full_year(),
            self.calendar_month(),
            self.day,
            self.hours,
            self.minutes,
            self.seconds
        )
    }

    /// Formats as ISO 8601 in UTC, e.g. `1999-12-24T12:30:17Z`.
    pub fn to_iso_8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.full_year(),
            self.calendar_month(),
            self.day,
            self.hours,
            self.minutes,
            self.seconds
        )
    }

    fn full_year(&self) -> i64 {
        i64::from(self.year) + 1900
    }

    /// 1-based month.  Wire values are not range-checked.
    fn calendar_month(&self) -> u32 {
        self.month.saturating_add(1)
    }
}

impl Decode for Time {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        Ok(Self {
            seconds: read_uint(cursor, "seconds")?,
            minutes: read_uint(cursor, "minutes")?,
            hours: read_uint(cursor, "hours")?,
            day: read_uint(cursor, "day")?,
            month: read_uint(cursor, "month")?,
            year: read_uint(cursor, "year")?,
            day_of_week: read_uint(cursor, "day of week")?,
            day_of_year: read_uint(cursor, "day of year")?,
            is_dst: bool::decode(cursor)?,
        })
    }
}

impl Encode for Time {
    fn encode(&self, out: &mut Vec<u8>) {
        encode_fields(
            out,
            &[
                &self.seconds,
                &self.minutes,
                &self.hours,
                &self.day,
                &self.month,
                &self.year,
                &self.day_of_week,
                &self.day_of_year,
                &self.is_dst,
            ],
        );
    }
}

// ── Proleptic Gregorian calendar arithmetic ───────────────────────────────────

/// Days since 1970-01-01 for a civil date (`month` and `day` 1-based).
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`days_from_civil`]: `(year, month 1..=12, day 1..=31)`.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u32;
    let month = if shifted_month < 10 {
        (shifted_month + 3) as u32
    } else {
        (shifted_month - 9) as u32
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
