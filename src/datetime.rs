//! Civil date-time and UTC-offset value types.
//!
//! These are the plain values crossing the query surface: a naive
//! [`LocalDateTime`], a resolved [`OffsetDateTime`], and the
//! minute-granular [`TimeOffset`]. Conversion to and from
//! [`EpochSeconds`] always goes through an explicit offset.

use core::fmt;

use crate::error::TimezoneError;
use crate::utils;
use crate::{EpochSeconds, TimezoneResult};

/// A UTC offset with minute granularity.
///
/// Offsets produced by the resolver are quantised to 15 minutes, the
/// resolution of the compiled zone database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOffset {
    minutes: i16,
}

impl TimeOffset {
    /// An offset of the given number of minutes east of UTC.
    #[must_use]
    pub const fn from_minutes(minutes: i16) -> Self {
        Self { minutes }
    }

    /// An offset from whole seconds; sub-minute precision is dropped.
    #[must_use]
    pub const fn from_seconds(seconds: i32) -> Self {
        Self {
            minutes: (seconds / 60) as i16,
        }
    }

    /// An offset from a count of 15-minute units.
    pub(crate) const fn from_code(code: i16) -> Self {
        Self { minutes: code * 15 }
    }

    #[must_use]
    pub const fn minutes(&self) -> i16 {
        self.minutes
    }

    #[must_use]
    pub const fn seconds(&self) -> i32 {
        self.minutes as i32 * 60
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minutes == 0
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let magnitude = self.minutes.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
    }
}

/// A date and time without any zone or offset attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDateTime {
    pub year: i16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl LocalDateTime {
    /// Create a validated civil date-time.
    pub fn new(
        year: i16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> TimezoneResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TimezoneError::range().with_message("month must be in 1..=12"));
        }
        if day < 1 || day > utils::days_in_month(i32::from(year), month) {
            return Err(TimezoneError::range().with_message("day is out of range for the month"));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(TimezoneError::range().with_message("time component out of range"));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// The date-time read off a clock running at `offset` from UTC at
    /// the instant `epoch_seconds`.
    #[must_use]
    pub fn from_epoch_seconds(epoch_seconds: EpochSeconds, offset: TimeOffset) -> Self {
        let shifted = epoch_seconds + i64::from(offset.seconds());
        let days = shifted.div_euclid(utils::SECONDS_PER_DAY) as i32;
        let mut seconds = shifted.rem_euclid(utils::SECONDS_PER_DAY) as u32;
        let (year, month, day) = utils::civil_from_local_days(days);
        let hour = (seconds / 3600) as u8;
        seconds %= 3600;
        Self {
            year,
            month,
            day,
            hour,
            minute: (seconds / 60) as u8,
            second: (seconds % 60) as u8,
        }
    }

    /// The instant at which a clock running at `offset` from UTC shows
    /// this date-time.
    #[must_use]
    pub fn to_epoch_seconds(&self, offset: TimeOffset) -> EpochSeconds {
        let days = i64::from(utils::local_days_from_civil(self.year, self.month, self.day));
        let day_seconds =
            i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second);
        days * utils::SECONDS_PER_DAY + day_seconds - i64::from(offset.seconds())
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A civil date-time paired with the UTC offset it was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetDateTime {
    pub datetime: LocalDateTime,
    pub offset: TimeOffset,
}

impl OffsetDateTime {
    /// Resolve an instant against a fixed offset.
    #[must_use]
    pub fn from_epoch_seconds(epoch_seconds: EpochSeconds, offset: TimeOffset) -> Self {
        Self {
            datetime: LocalDateTime::from_epoch_seconds(epoch_seconds, offset),
            offset,
        }
    }

    #[must_use]
    pub fn to_epoch_seconds(&self) -> EpochSeconds {
        self.datetime.to_epoch_seconds(self.offset)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)
    }
}
