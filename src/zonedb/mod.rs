//! The compiled zone database: records, brokers, registry, and a baked
//! data snapshot.
//!
//! The database is the in-memory compiled form of the IANA TZ source: a
//! zone is a sequence of eras, an era optionally names a rule policy,
//! and a policy is a set of rules plus a table of multi-character
//! letters. Everything is `'static`, designed to live in read-only
//! program data, and is consumed through the read-only broker wrappers
//! in [`broker`].
//!
//! Offsets and deltas are counts of 15-minute units stored in a signed
//! byte. Years are stored "tiny": a signed byte relative to
//! [`EPOCH_YEAR`](crate::EPOCH_YEAR), with [`INVALID_YEAR_TINY`] as the
//! missing-value sentinel and [`MAX_YEAR_TINY`] reserved to mean
//! "largest" so boundary arithmetic cannot overflow.

pub mod broker;
pub mod data;
pub mod registry;

pub use broker::{ZoneEraBroker, ZoneInfoBroker, ZonePolicyBroker, ZoneRuleBroker};
pub use registry::ZoneRegistrar;

/// The clock a time value is expressed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeKind {
    /// Local wall clock, including any daylight shift.
    #[default]
    Wall,
    /// Local standard time, excluding daylight shifts.
    Standard,
    /// Universal time.
    Universal,
}

/// Sentinel tiny year meaning "no year".
pub const INVALID_YEAR_TINY: i8 = i8::MIN;

/// Tiny year reserved to mean "largest representable".
pub const MAX_YEAR_TINY: i8 = i8::MAX;

/// Smallest usable tiny year.
pub const MIN_YEAR_TINY: i8 = i8::MIN + 1;

/// One line of a rule policy: the years it spans, the moment within
/// those years it fires, and the daylight delta plus abbreviation
/// letter it establishes.
#[derive(Debug)]
pub struct ZoneRule {
    pub from_year_tiny: i8,
    pub to_year_tiny: i8,
    /// Month the rule fires in, 1-12.
    pub in_month: u8,
    /// ISO day of week (1 = Monday .. 7 = Sunday); 0 selects
    /// `on_day_of_month` directly.
    pub on_day_of_week: u8,
    /// Day of month anchor; 0 means the last `on_day_of_week` of the
    /// month, negative means on or before its magnitude.
    pub on_day_of_month: i8,
    /// Time of day in 15-minute units.
    pub at_time_code: u8,
    pub at_time_kind: TimeKind,
    /// Daylight shift in 15-minute units.
    pub delta_code: i8,
    /// A printable ASCII byte (>= 32), or an index (< 32) into the
    /// owning policy's letter table.
    pub letter: u8,
}

/// A named collection of rules together with the letter table indexed
/// rules may refer to.
#[derive(Debug)]
pub struct ZonePolicy {
    pub rules: &'static [ZoneRule],
    pub letters: &'static [&'static str],
}

/// One era of a zone: a base offset and either a fixed delta or a rule
/// policy, in force until the UNTIL moment.
#[derive(Debug)]
pub struct ZoneEra {
    /// Base UTC offset in 15-minute units.
    pub offset_code: i8,
    /// The rule policy in force, or `None` for a fixed-delta era.
    pub policy: Option<&'static ZonePolicy>,
    /// Fixed daylight delta in 15-minute units; only meaningful when
    /// `policy` is `None`.
    pub delta_code: i8,
    /// Abbreviation template: verbatim, with a `%` letter slot, or a
    /// `std/dst` pair.
    pub format: &'static str,
    pub until_year_tiny: i8,
    pub until_month: u8,
    pub until_day: u8,
    /// Time of day of the UNTIL moment in 15-minute units.
    pub until_time_code: u8,
    pub until_time_kind: TimeKind,
}

/// A complete zone: its identifier, the year window the compiled data
/// is valid for, and the era sequence.
#[derive(Debug)]
pub struct ZoneInfo {
    pub name: &'static str,
    /// Stable numeric identifier; see [`zone_identifier`].
    pub zone_id: u32,
    /// First year with fully accurate transition data.
    pub start_year: i16,
    /// Last year with fully accurate transition data.
    pub until_year: i16,
    pub eras: &'static [ZoneEra],
}

/// The sentinel era logically preceding every zone's first real era,
/// giving it a defined start in the infinite past.
pub static ANCHOR_ERA: ZoneEra = ZoneEra {
    offset_code: 0,
    policy: None,
    delta_code: 0,
    format: "",
    until_year_tiny: MIN_YEAR_TINY,
    until_month: 1,
    until_day: 1,
    until_time_code: 0,
    until_time_kind: TimeKind::Wall,
};

/// The stable numeric identifier of a zone name (djb2 over its bytes).
#[must_use]
pub const fn zone_identifier(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash: u32 = 5381;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(33).wrapping_add(bytes[i] as u32);
        i += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::zone_identifier;

    #[test]
    fn identifiers_are_stable_and_distinct() {
        let la = zone_identifier("America/Los_Angeles");
        assert_eq!(la, zone_identifier("America/Los_Angeles"));
        assert_ne!(la, zone_identifier("America/New_York"));
        assert_ne!(la, zone_identifier("Etc/UTC"));
    }
}
