//! `timezone-resolver` answers time-zone questions from a compiled,
//! memory-resident snapshot of the IANA TZ Database: for an instant or a
//! wall-clock moment in a named zone, what is the total UTC offset, how
//! much of it is daylight saving, which abbreviation applies ("PST",
//! "PDT", ...), and where are the boundaries of the surrounding
//! transition.
//!
//! The engine materialises the transitions straddling a single query
//! year into a fixed-capacity pool, so the query path performs no heap
//! allocation and its worst case cost is bounded by the pool size. The
//! crate is `no_std`; `alloc` is only touched by the zone registry's
//! name index.
//!
//! ```
//! use timezone_resolver::zonedb::data::AMERICA_LOS_ANGELES;
//! use timezone_resolver::ZoneProcessor;
//!
//! let mut processor = ZoneProcessor::new(&AMERICA_LOS_ANGELES);
//! // 2018-03-11T10:00:00Z, the instant the springtime shift took hold.
//! let offset = processor.utc_offset(574_077_600).unwrap();
//! assert_eq!(offset.minutes(), -7 * 60);
//! assert_eq!(processor.abbreviation(574_077_600).unwrap().as_str(), "PDT");
//! ```
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

extern crate alloc;

pub mod datetime;
pub mod error;
pub mod processor;
pub mod zonedb;

pub(crate) mod date_tuple;
pub(crate) mod utils;

/// Re-export of `TinyAsciiStr` from `tinystr`; abbreviations are
/// returned in this form.
pub use tinystr::TinyAsciiStr;

#[doc(inline)]
pub use error::TimezoneError;

pub use datetime::{LocalDateTime, OffsetDateTime, TimeOffset};
pub use processor::{cache::ZoneProcessorCache, ZoneProcessor};
pub use zonedb::TimeKind;

/// The crate-wide result type.
pub type TimezoneResult<T> = Result<T, TimezoneError>;

/// Seconds relative to the local epoch `2000-01-01T00:00:00Z`.
///
/// All instants handled by the engine use this scale rather than the
/// Unix epoch; the compiled zone database stores its "tiny" years
/// relative to the same [`EPOCH_YEAR`].
pub type EpochSeconds = i64;

/// The year the [`EpochSeconds`] scale and the database's tiny years
/// are relative to.
pub const EPOCH_YEAR: i16 = 2000;
