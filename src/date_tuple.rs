//! The three-mode date tuple and its interval algebra.
//!
//! A [`DateTuple`] is a civil date plus a time-of-day counted in
//! 15-minute units, tagged with the clock it is expressed against
//! (wall, standard, or universal). Transition arithmetic runs entirely
//! on these tuples: ordering ignores the clock tag, equality respects
//! it, and [`expand_date_tuple`] converts a tuple into all three clocks
//! at once given the UTC offset in force just before the moment it
//! names.

use core::cmp::Ordering;

use crate::utils;
use crate::zonedb::TimeKind;

/// One day expressed in 15-minute units.
pub(crate) const ONE_DAY_CODE: i16 = 96;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DateTuple {
    pub(crate) year: i16,
    pub(crate) month: u8,
    pub(crate) day: u8,
    /// 15-minute units from midnight. May be negative or exceed one
    /// day mid-computation; [`DateTuple::normalized`] restores the
    /// `-96 < time_code < 96` invariant.
    pub(crate) time_code: i16,
    pub(crate) kind: TimeKind,
}

impl DateTuple {
    pub(crate) const fn new(year: i16, month: u8, day: u8, time_code: i16, kind: TimeKind) -> Self {
        Self {
            year,
            month,
            day,
            time_code,
            kind,
        }
    }

    /// Total order over `(year, month, day, time_code)`, ignoring the
    /// clock tag. Derived `PartialEq` compares the tag as well, which
    /// is why this is a method rather than an `Ord` impl.
    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day, self.time_code).cmp(&(
            other.year,
            other.month,
            other.day,
            other.time_code,
        ))
    }

    /// Carry an out-of-range `time_code` into the civil date. All
    /// callers add at most a combined offset-and-delta to a value that
    /// was within one day, so a single carry step suffices.
    pub(crate) fn normalized(mut self) -> Self {
        if self.time_code <= -ONE_DAY_CODE {
            let (year, month, day) = utils::previous_day(self.year, self.month, self.day);
            self.year = year;
            self.month = month;
            self.day = day;
            self.time_code += ONE_DAY_CODE;
        } else if self.time_code >= ONE_DAY_CODE {
            let (year, month, day) = utils::next_day(self.year, self.month, self.day);
            self.year = year;
            self.month = month;
            self.day = day;
            self.time_code -= ONE_DAY_CODE;
        }
        self
    }
}

/// A coarse year/month pair delimiting a viewing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YearMonth {
    pub(crate) year: i16,
    pub(crate) month: u8,
}

/// Convert `tt` into wall, standard, and universal renditions, assuming
/// `offset_code + delta_code` is the effective UTC offset just before
/// the moment `tt` names. The relations are `wall = standard + delta`
/// and `standard = universal + offset`; every result is normalised.
pub(crate) fn expand_date_tuple(
    tt: DateTuple,
    offset_code: i16,
    delta_code: i16,
) -> (DateTuple, DateTuple, DateTuple) {
    let at = |time_code: i16, kind: TimeKind| {
        DateTuple::new(tt.year, tt.month, tt.day, time_code, kind).normalized()
    };

    match tt.kind {
        TimeKind::Standard => (
            at(tt.time_code + delta_code, TimeKind::Wall),
            tt.normalized(),
            at(tt.time_code - offset_code, TimeKind::Universal),
        ),
        TimeKind::Universal => (
            at(tt.time_code + offset_code + delta_code, TimeKind::Wall),
            at(tt.time_code + offset_code, TimeKind::Standard),
            tt.normalized(),
        ),
        TimeKind::Wall => (
            tt.normalized(),
            at(tt.time_code - delta_code, TimeKind::Standard),
            at(tt.time_code - delta_code - offset_code, TimeKind::Universal),
        ),
    }
}
