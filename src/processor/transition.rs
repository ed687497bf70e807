//! The transition value type and the era-slice it derives from.

use tinystr::TinyAsciiStr;

use crate::date_tuple::DateTuple;
use crate::zonedb::{ZoneEraBroker, ZoneRuleBroker, ANCHOR_ERA};
use crate::EpochSeconds;

/// Capacity of the abbreviation buffer. Longer abbreviations are
/// silently truncated.
pub(crate) const ABBREV_CAPACITY: usize = 8;

/// Capacity of the single-letter buffer.
pub(crate) const LETTER_CAPACITY: usize = 4;

/// An era projected onto a query's viewing window: the era plus the
/// effective start and until moments after clamping to the window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ZoneMatch {
    pub(crate) start_date_time: DateTuple,
    pub(crate) until_date_time: DateTuple,
    pub(crate) era: ZoneEraBroker,
}

impl ZoneMatch {
    /// A placeholder match used to initialise storage; it is never read
    /// before being overwritten by the match finder.
    pub(crate) fn empty() -> Self {
        Self {
            start_date_time: DateTuple::default(),
            until_date_time: DateTuple::default(),
            era: ZoneEraBroker::new(&ANCHOR_ERA),
        }
    }
}

/// An interval during which the zone held one `(offset, delta,
/// abbreviation)` triple.
///
/// A transition is *simple* when `rule` is `None` (the interval is
/// driven entirely by its era) and *named* otherwise. The
/// `transition_time*` fields are authored relative to the offset of the
/// **previous** transition; `start_date_time`, `until_date_time` and
/// `start_epoch_seconds` are derived in later pipeline passes and are
/// the fields queries search on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Transition {
    /// Index of the generating match in the processor's match array.
    pub(crate) match_index: u8,
    pub(crate) rule: Option<ZoneRuleBroker>,
    /// The rule's firing moment, rewritten into wall mode by the
    /// fix-up pass.
    pub(crate) transition_time: DateTuple,
    /// Standard-mode shadow of `transition_time`.
    pub(crate) transition_time_std: DateTuple,
    /// Universal-mode shadow of `transition_time`.
    pub(crate) transition_time_utc: DateTuple,
    /// Interval start in this transition's own offset.
    pub(crate) start_date_time: DateTuple,
    /// Interval end in this transition's own offset.
    pub(crate) until_date_time: DateTuple,
    /// Set when a prior transition is slid up to its match's start.
    pub(crate) original_transition_time: Option<DateTuple>,
    pub(crate) start_epoch_seconds: EpochSeconds,
    pub(crate) abbrev: TinyAsciiStr<ABBREV_CAPACITY>,
    /// Storage for a printable single-character rule letter.
    pub(crate) letter_buf: TinyAsciiStr<LETTER_CAPACITY>,
    /// Candidate-generation flag: a usable prior transition was found.
    pub(crate) is_valid_prior: bool,
    /// Selection flag: the transition falls inside its match.
    pub(crate) active: bool,
    /// Base UTC offset inherited from the era, 15-minute units.
    pub(crate) offset_code: i8,
    /// Daylight delta from the rule (named) or era (simple).
    pub(crate) delta_code: i8,
}

impl Transition {
    pub(crate) fn empty() -> Self {
        Self {
            match_index: 0,
            rule: None,
            transition_time: DateTuple::default(),
            transition_time_std: DateTuple::default(),
            transition_time_utc: DateTuple::default(),
            start_date_time: DateTuple::default(),
            until_date_time: DateTuple::default(),
            original_transition_time: None,
            start_epoch_seconds: 0,
            abbrev: empty_tiny(),
            letter_buf: empty_tiny(),
            is_valid_prior: false,
            active: false,
            offset_code: 0,
            delta_code: 0,
        }
    }

    /// The effective letter string for abbreviation interpolation.
    ///
    /// `None` when the transition has no rule (the era's template is
    /// copied verbatim). A printable rule letter comes from
    /// `letter_buf`; an indexed letter is read from the policy's letter
    /// table, falling back to the empty buffer if the index is out of
    /// range.
    pub(crate) fn letter(&self, zone_match: &ZoneMatch) -> Option<&str> {
        let rule = self.rule?;
        let letter = rule.letter();
        if letter >= 32 {
            return Some(self.letter_buf.as_str());
        }
        if let Some(policy) = zone_match.era.zone_policy() {
            if usize::from(letter) < policy.num_letters() {
                return Some(policy.letter(usize::from(letter)));
            }
        }
        Some(self.letter_buf.as_str())
    }
}

/// An empty `TinyAsciiStr` of any capacity.
pub(crate) fn empty_tiny<const N: usize>() -> TinyAsciiStr<N> {
    TinyAsciiStr::try_from_str("").expect("the empty string is valid ASCII")
}

/// A one-character `TinyAsciiStr`; non-ASCII bytes yield the empty
/// string.
pub(crate) fn single_letter(byte: u8) -> TinyAsciiStr<LETTER_CAPACITY> {
    let buf = [byte];
    match core::str::from_utf8(&buf) {
        Ok(s) => TinyAsciiStr::try_from_str(s).unwrap_or(empty_tiny()),
        Err(_) => empty_tiny(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_tuple::DateTuple;
    use crate::zonedb::data::AMERICA_ST_JOHNS;
    use crate::zonedb::{TimeKind, ZoneEraBroker};

    fn match_for_era(index: usize) -> ZoneMatch {
        ZoneMatch {
            start_date_time: DateTuple::new(2007, 1, 1, 0, TimeKind::Wall),
            until_date_time: DateTuple::new(2008, 1, 1, 0, TimeKind::Wall),
            era: ZoneEraBroker::new(&AMERICA_ST_JOHNS.eras[index]),
        }
    }

    #[test]
    fn letter_resolution() {
        let zone_match = match_for_era(0);
        let policy = zone_match.era.zone_policy().expect("era names a policy");

        // No rule: no letter at all.
        let mut transition = Transition::empty();
        assert_eq!(transition.letter(&zone_match), None);

        // Printable letter comes from the buffer.
        transition.rule = Some(policy.rule(0));
        transition.letter_buf = single_letter(b'D');
        assert_eq!(transition.letter(&zone_match), Some("D"));

        // Indexed letter comes from the policy's table.
        transition.rule = Some(policy.rule(2));
        transition.letter_buf = empty_tiny();
        assert_eq!(transition.letter(&zone_match), Some("DD"));
    }
}
