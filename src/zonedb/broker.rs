//! Read-only accessors over the compiled zone records.
//!
//! Brokers are copyable handles that expose the database through a
//! narrow accessor surface, keeping the record layout a private detail
//! of the data model. They never own the data they point at; identity
//! is pointer identity.

use crate::zonedb::{TimeKind, ZoneEra, ZoneInfo, ZonePolicy, ZoneRule};
use crate::EPOCH_YEAR;

#[derive(Debug, Clone, Copy)]
pub struct ZoneInfoBroker(&'static ZoneInfo);

impl ZoneInfoBroker {
    #[must_use]
    pub const fn new(info: &'static ZoneInfo) -> Self {
        Self(info)
    }

    #[must_use]
    pub fn num_eras(&self) -> usize {
        self.0.eras.len()
    }

    #[must_use]
    pub fn era(&self, index: usize) -> ZoneEraBroker {
        ZoneEraBroker(&self.0.eras[index])
    }

    #[must_use]
    pub const fn start_year(&self) -> i16 {
        self.0.start_year
    }

    #[must_use]
    pub const fn until_year(&self) -> i16 {
        self.0.until_year
    }

    #[must_use]
    pub const fn zone_id(&self) -> u32 {
        self.0.zone_id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.name
    }
}

impl PartialEq for ZoneInfoBroker {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZoneEraBroker(&'static ZoneEra);

impl ZoneEraBroker {
    #[must_use]
    pub const fn new(era: &'static ZoneEra) -> Self {
        Self(era)
    }

    #[must_use]
    pub const fn offset_code(&self) -> i8 {
        self.0.offset_code
    }

    #[must_use]
    pub fn zone_policy(&self) -> Option<ZonePolicyBroker> {
        self.0.policy.map(ZonePolicyBroker)
    }

    #[must_use]
    pub const fn delta_code(&self) -> i8 {
        self.0.delta_code
    }

    #[must_use]
    pub const fn format(&self) -> &'static str {
        self.0.format
    }

    #[must_use]
    pub const fn until_year_tiny(&self) -> i8 {
        self.0.until_year_tiny
    }

    /// The UNTIL year as a full Gregorian year.
    #[must_use]
    pub const fn until_year(&self) -> i16 {
        EPOCH_YEAR + self.0.until_year_tiny as i16
    }

    #[must_use]
    pub const fn until_month(&self) -> u8 {
        self.0.until_month
    }

    #[must_use]
    pub const fn until_day(&self) -> u8 {
        self.0.until_day
    }

    #[must_use]
    pub const fn until_time_code(&self) -> u8 {
        self.0.until_time_code
    }

    #[must_use]
    pub const fn until_time_kind(&self) -> TimeKind {
        self.0.until_time_kind
    }
}

impl PartialEq for ZoneEraBroker {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZonePolicyBroker(&'static ZonePolicy);

impl ZonePolicyBroker {
    #[must_use]
    pub fn num_rules(&self) -> usize {
        self.0.rules.len()
    }

    #[must_use]
    pub fn rule(&self, index: usize) -> ZoneRuleBroker {
        ZoneRuleBroker(&self.0.rules[index])
    }

    #[must_use]
    pub fn num_letters(&self) -> usize {
        self.0.letters.len()
    }

    #[must_use]
    pub fn letter(&self, index: usize) -> &'static str {
        self.0.letters[index]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZoneRuleBroker(&'static ZoneRule);

impl ZoneRuleBroker {
    #[must_use]
    pub const fn from_year_tiny(&self) -> i8 {
        self.0.from_year_tiny
    }

    #[must_use]
    pub const fn to_year_tiny(&self) -> i8 {
        self.0.to_year_tiny
    }

    #[must_use]
    pub const fn from_year(&self) -> i16 {
        EPOCH_YEAR + self.0.from_year_tiny as i16
    }

    #[must_use]
    pub const fn to_year(&self) -> i16 {
        EPOCH_YEAR + self.0.to_year_tiny as i16
    }

    #[must_use]
    pub const fn in_month(&self) -> u8 {
        self.0.in_month
    }

    #[must_use]
    pub const fn on_day_of_week(&self) -> u8 {
        self.0.on_day_of_week
    }

    #[must_use]
    pub const fn on_day_of_month(&self) -> i8 {
        self.0.on_day_of_month
    }

    #[must_use]
    pub const fn at_time_code(&self) -> u8 {
        self.0.at_time_code
    }

    #[must_use]
    pub const fn at_time_kind(&self) -> TimeKind {
        self.0.at_time_kind
    }

    #[must_use]
    pub const fn delta_code(&self) -> i8 {
        self.0.delta_code
    }

    /// The raw letter byte: printable ASCII (>= 32) or an index (< 32)
    /// into the policy letter table.
    #[must_use]
    pub const fn letter(&self) -> u8 {
        self.0.letter
    }
}

impl PartialEq for ZoneRuleBroker {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}
