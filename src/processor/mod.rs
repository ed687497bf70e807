//! The transition-computation engine.
//!
//! A [`ZoneProcessor`] materialises the transitions of one zone around
//! a single query year into its fixed-capacity pool and memoises the
//! result until a different year is requested. Filling runs in phases:
//!
//! 1. project the zone's eras onto a 14-month window straddling the
//!    year, producing up to four matches;
//! 2. for each match, generate candidate transitions from its rule
//!    policy (or a single era-driven transition), keep the subset that
//!    bounds or falls inside the match, and promote it into the pool's
//!    Active region in sorted order;
//! 3. rewrite every transition time into wall mode, derive each
//!    interval's start/until in its own offset plus the start instant
//!    in epoch seconds, and interpolate the abbreviations.
//!
//! Queries then search the Active region. Any query may refill the
//! memo, so the whole surface takes `&mut self`; the engine is not
//! meant to be shared between threads.

pub mod cache;
pub(crate) mod storage;
pub(crate) mod transition;

use core::cmp::Ordering;

use log::{debug, trace};
use tinystr::TinyAsciiStr;

use crate::date_tuple::{expand_date_tuple, DateTuple, YearMonth};
use crate::datetime::{LocalDateTime, OffsetDateTime, TimeOffset};
use crate::error::TimezoneError;
use crate::processor::storage::TransitionStorage;
use crate::processor::transition::{
    empty_tiny, single_letter, Transition, ZoneMatch, ABBREV_CAPACITY, LETTER_CAPACITY,
};
use crate::utils;
use crate::zonedb::{
    TimeKind, ZoneEraBroker, ZoneInfo, ZoneInfoBroker, ZoneRuleBroker, ANCHOR_ERA,
};
use crate::{EpochSeconds, TimezoneResult};

/// Matches kept per query year: the eras overlapping the 14-month
/// window, which is at most the three straddled years plus one.
pub const MAX_MATCHES: usize = 4;

/// Default transition pool capacity. Every zone in the TZ Database
/// stays within seven live transitions per window; eight leaves a
/// margin.
pub const MAX_TRANSITIONS: usize = 8;

/// Interior years a rule can contribute within one window.
const MAX_INTERIOR_YEARS: usize = 4;

/// Where a transition sits relative to a match interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchRelation {
    Before,
    AtStart,
    Within,
    After,
}

/// A transition-computation engine bound to one zone.
///
/// `CAP` is the transition pool capacity; the default suits every zone
/// in the TZ Database.
#[derive(Debug)]
pub struct ZoneProcessor<const CAP: usize = MAX_TRANSITIONS> {
    zone_info: ZoneInfoBroker,
    year: i16,
    is_filled: bool,
    num_matches: usize,
    matches_overflow: bool,
    matches: [ZoneMatch; MAX_MATCHES],
    storage: TransitionStorage<CAP>,
}

impl ZoneProcessor {
    /// An engine with the default pool capacity bound to `zone_info`.
    #[must_use]
    pub fn new(zone_info: &'static ZoneInfo) -> Self {
        Self::with_capacity(zone_info)
    }
}

impl<const CAP: usize> ZoneProcessor<CAP> {
    /// An engine whose pool capacity is given by `CAP`.
    #[must_use]
    pub fn with_capacity(zone_info: &'static ZoneInfo) -> Self {
        Self {
            zone_info: ZoneInfoBroker::new(zone_info),
            year: 0,
            is_filled: false,
            num_matches: 0,
            matches_overflow: false,
            matches: [ZoneMatch::empty(); MAX_MATCHES],
            storage: TransitionStorage::new(),
        }
    }

    /// The stable numeric identifier of the bound zone.
    #[must_use]
    pub fn zone_id(&self) -> u32 {
        self.zone_info.zone_id()
    }

    /// The IANA identifier of the bound zone.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.zone_info.name()
    }

    /// Bind the processor to a different zone, invalidating the year
    /// memo. Rebinding to the zone already bound is a no-op.
    pub fn set_zone_info(&mut self, zone_info: &'static ZoneInfo) {
        let broker = ZoneInfoBroker::new(zone_info);
        if self.zone_info == broker {
            return;
        }
        debug!("rebinding processor {} -> {}", self.name(), broker.name());
        self.zone_info = broker;
        self.year = 0;
        self.is_filled = false;
        self.num_matches = 0;
    }

    /// The total UTC offset (standard plus daylight) in force at
    /// `epoch_seconds`.
    pub fn utc_offset(&mut self, epoch_seconds: EpochSeconds) -> TimezoneResult<TimeOffset> {
        self.init_for_epoch(epoch_seconds)?;
        let transition = self
            .storage
            .find_transition(epoch_seconds)
            .ok_or_else(no_covering_transition)?;
        Ok(total_offset(transition))
    }

    /// The daylight portion of the offset in force at `epoch_seconds`;
    /// zero outside daylight saving.
    pub fn dst_offset(&mut self, epoch_seconds: EpochSeconds) -> TimezoneResult<TimeOffset> {
        self.init_for_epoch(epoch_seconds)?;
        let transition = self
            .storage
            .find_transition(epoch_seconds)
            .ok_or_else(no_covering_transition)?;
        Ok(TimeOffset::from_code(i16::from(transition.delta_code)))
    }

    /// The abbreviation in force at `epoch_seconds`, e.g. `"PDT"`.
    pub fn abbreviation(
        &mut self,
        epoch_seconds: EpochSeconds,
    ) -> TimezoneResult<TinyAsciiStr<ABBREV_CAPACITY>> {
        self.init_for_epoch(epoch_seconds)?;
        let transition = self
            .storage
            .find_transition(epoch_seconds)
            .ok_or_else(no_covering_transition)?;
        Ok(transition.abbrev)
    }

    /// Resolve a naive local date-time against the zone.
    ///
    /// Inside a daylight gap the prior interval's offset is extended
    /// forward, so the result lands just after the shift (02:30 in the
    /// springtime gap resolves to 03:30). Inside an overlap the later
    /// interval wins. The result round-trips stably: resolving its
    /// epoch seconds again yields the same offset.
    pub fn offset_date_time(&mut self, datetime: &LocalDateTime) -> TimezoneResult<OffsetDateTime> {
        self.init_for_year(datetime.year)?;
        let offset = {
            let transition = self
                .storage
                .find_transition_for_date_time(datetime)
                .ok_or_else(no_covering_transition)?;
            total_offset(transition)
        };

        // The first probe may have landed in a gap or an overlap:
        // convert with its offset, then let the instant pick the
        // definitive interval.
        let epoch_seconds = datetime.to_epoch_seconds(offset);
        let transition = self
            .storage
            .find_transition(epoch_seconds)
            .ok_or_else(no_covering_transition)?;
        Ok(OffsetDateTime::from_epoch_seconds(
            epoch_seconds,
            total_offset(transition),
        ))
    }

    /// Largest pool index ever used since the last fill; `CAP` means
    /// the pool overflowed and transitions were dropped.
    #[must_use]
    pub fn transition_high_water(&self) -> usize {
        self.storage.high_water()
    }

    /// Zero the pool's high-water mark. Filling the cache for a new
    /// year also resets it; this makes the mark attributable to a
    /// chosen set of queries within a cached year.
    pub fn reset_transition_high_water(&mut self) {
        self.storage.reset_high_water();
    }

    /// Whether the last fill found more overlapping eras than the
    /// match array holds (the excess was dropped).
    #[must_use]
    pub fn matches_overflowed(&self) -> bool {
        self.matches_overflow
    }

    fn init_for_epoch(&mut self, epoch_seconds: EpochSeconds) -> TimezoneResult<()> {
        let days = epoch_seconds.div_euclid(utils::SECONDS_PER_DAY) as i32;
        let (year, _, _) = utils::civil_from_local_days(days);
        self.init_for_year(year)
    }

    /// Fill the year memo, or reuse it when `year` is already cached.
    fn init_for_year(&mut self, year: i16) -> TimezoneResult<()> {
        if self.is_filled && year == self.year {
            return Ok(());
        }
        self.is_filled = false;
        if year < self.zone_info.start_year() - 1 || self.zone_info.until_year() < year {
            return Err(TimezoneError::range()
                .with_message("year is outside the zone database's supported window"));
        }
        trace!("{}: filling transition cache for {year}", self.name());

        self.year = year;
        self.num_matches = 0;
        self.storage.init();

        let start_ym = YearMonth {
            year: year - 1,
            month: 12,
        };
        let until_ym = YearMonth {
            year: year + 1,
            month: 2,
        };
        let (num_matches, overflow) =
            find_matches(self.zone_info, start_ym, until_ym, &mut self.matches);
        self.num_matches = num_matches;
        self.matches_overflow = overflow;

        for index in 0..self.num_matches {
            let zone_match = self.matches[index];
            find_transitions_for_match(&mut self.storage, &zone_match, index as u8);
        }
        let active = self.storage.active_range();
        fix_transition_times(&mut self.storage, active);
        generate_start_until_times(&mut self.storage, &self.matches[..self.num_matches]);
        calc_abbreviations(&mut self.storage, &self.matches[..self.num_matches]);

        trace!(
            "{}: {} matches, {} active transitions, high water {}",
            self.name(),
            self.num_matches,
            self.storage.active_range().len(),
            self.storage.high_water()
        );
        self.is_filled = true;
        Ok(())
    }
}

fn no_covering_transition() -> TimezoneError {
    TimezoneError::range().with_message("no transition covers the requested moment")
}

fn total_offset(transition: &Transition) -> TimeOffset {
    TimeOffset::from_code(i16::from(transition.offset_code) + i16::from(transition.delta_code))
}

/// Project the zone's eras onto `[start_ym, until_ym)`. Era start
/// dates are the previous era's UNTIL (the anchor era for the first),
/// and both ends are clamped to the window. Returns the match count
/// and whether matches beyond the array capacity were dropped.
fn find_matches(
    zone_info: ZoneInfoBroker,
    start_ym: YearMonth,
    until_ym: YearMonth,
    matches: &mut [ZoneMatch; MAX_MATCHES],
) -> (usize, bool) {
    let mut count = 0;
    let mut overflow = false;
    let mut prev = ZoneEraBroker::new(&ANCHOR_ERA);
    for index in 0..zone_info.num_eras() {
        let era = zone_info.era(index);
        if era_overlaps_interval(prev, era, start_ym, until_ym) {
            if count < MAX_MATCHES {
                matches[count] = create_match(prev, era, start_ym, until_ym);
                count += 1;
            } else {
                overflow = true;
            }
        }
        prev = era;
    }
    (count, overflow)
}

/// The era interval is `[prev.until, era.until)`; it overlaps the
/// window iff `prev.until < until_ym` and `era.until > start_ym`. The
/// window carries a month of slack at both ends, so the coarse
/// year/month comparison is sufficient.
fn era_overlaps_interval(
    prev: ZoneEraBroker,
    era: ZoneEraBroker,
    start_ym: YearMonth,
    until_ym: YearMonth,
) -> bool {
    compare_era_to_year_month(prev, until_ym.year, until_ym.month) == Ordering::Less
        && compare_era_to_year_month(era, start_ym.year, start_ym.month) == Ordering::Greater
}

/// Compare an era's UNTIL moment against a year/month, ignoring
/// day-of-month at one and sub-midnight time codes.
fn compare_era_to_year_month(era: ZoneEraBroker, year: i16, month: u8) -> Ordering {
    let by_year = era.until_year().cmp(&year);
    if by_year != Ordering::Equal {
        return by_year;
    }
    let by_month = era.until_month().cmp(&month);
    if by_month != Ordering::Equal {
        return by_month;
    }
    if era.until_day() > 1 {
        return Ordering::Greater;
    }
    if era.until_time_code() > 0 {
        return Ordering::Greater;
    }
    Ordering::Equal
}

fn era_until_tuple(era: ZoneEraBroker) -> DateTuple {
    DateTuple::new(
        era.until_year(),
        era.until_month(),
        era.until_day(),
        i16::from(era.until_time_code()),
        era.until_time_kind(),
    )
}

fn create_match(
    prev: ZoneEraBroker,
    era: ZoneEraBroker,
    start_ym: YearMonth,
    until_ym: YearMonth,
) -> ZoneMatch {
    let mut start_date_time = era_until_tuple(prev);
    let lower_bound = DateTuple::new(start_ym.year, start_ym.month, 1, 0, TimeKind::Wall);
    if start_date_time.compare(&lower_bound) == Ordering::Less {
        start_date_time = lower_bound;
    }

    let mut until_date_time = era_until_tuple(era);
    let upper_bound = DateTuple::new(until_ym.year, until_ym.month, 1, 0, TimeKind::Wall);
    if upper_bound.compare(&until_date_time) == Ordering::Less {
        until_date_time = upper_bound;
    }

    ZoneMatch {
        start_date_time,
        until_date_time,
        era,
    }
}

fn find_transitions_for_match<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    zone_match: &ZoneMatch,
    match_index: u8,
) {
    if zone_match.era.zone_policy().is_some() {
        find_transitions_from_named_match(storage, zone_match, match_index);
    } else {
        find_transitions_from_simple_match(storage, zone_match, match_index);
    }
}

/// A policy-less era contributes exactly one transition starting at
/// the match start.
fn find_transitions_from_simple_match<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    zone_match: &ZoneMatch,
    match_index: u8,
) {
    let free = storage.free_agent_index();
    *storage.transition_mut(free) = create_transition_for_year(0, None, match_index, zone_match);
    storage.add_free_agent_to_active_pool();
}

fn find_transitions_from_named_match<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    zone_match: &ZoneMatch,
    match_index: u8,
) {
    storage.reset_candidate_pool();
    find_candidate_transitions(storage, zone_match, match_index);
    let candidates = storage.candidate_range();
    fix_transition_times(storage, candidates);
    select_active_transitions(storage, zone_match);
    storage.add_active_candidates_to_active_pool();
}

/// Generate candidates from every rule activation near the match, and
/// track the most recent transition before it in the reserved Prior
/// slot.
fn find_candidate_transitions<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    zone_match: &ZoneMatch,
    match_index: u8,
) {
    let Some(policy) = zone_match.era.zone_policy() else {
        return;
    };
    let start_year = zone_match.start_date_time.year;
    let end_year = zone_match.until_date_time.year;

    storage.reserve_prior();
    storage.prior_mut().is_valid_prior = false;

    for rule_index in 0..policy.num_rules() {
        let rule = policy.rule(rule_index);

        let (years, num_years) =
            calc_interior_years(rule.from_year(), rule.to_year(), start_year, end_year);
        for &year in &years[..num_years] {
            let free = storage.free_agent_index();
            *storage.transition_mut(free) =
                create_transition_for_year(year, Some(rule), match_index, zone_match);
            match compare_transition_to_match_fuzzy(storage.transition(free), zone_match) {
                MatchRelation::Before => set_as_prior_transition(storage),
                MatchRelation::Within => storage.add_free_agent_to_candidate_pool(),
                // Well past the match: the free agent is dropped and
                // its slot reissued.
                _ => {}
            }
        }

        if let Some(prior_year) =
            most_recent_prior_year(rule.from_year(), rule.to_year(), start_year)
        {
            let free = storage.free_agent_index();
            *storage.transition_mut(free) =
                create_transition_for_year(prior_year, Some(rule), match_index, zone_match);
            set_as_prior_transition(storage);
        }
    }

    if storage.prior().is_valid_prior {
        storage.add_prior_to_candidate_pool();
    }
}

/// The years in `[start_year, end_year]` that activate a rule spanning
/// `[from_year, to_year]`, capped at [`MAX_INTERIOR_YEARS`].
fn calc_interior_years(
    from_year: i16,
    to_year: i16,
    start_year: i16,
    end_year: i16,
) -> ([i16; MAX_INTERIOR_YEARS], usize) {
    let mut years = [0i16; MAX_INTERIOR_YEARS];
    let mut count = 0;
    let mut year = start_year;
    while year <= end_year && count < MAX_INTERIOR_YEARS {
        if from_year <= year && year <= to_year {
            years[count] = year;
            count += 1;
        }
        year += 1;
    }
    (years, count)
}

/// The latest activation year of the rule strictly before the match
/// start, if any.
fn most_recent_prior_year(from_year: i16, to_year: i16, start_year: i16) -> Option<i16> {
    if from_year < start_year {
        if to_year < start_year {
            Some(to_year)
        } else {
            Some(start_year - 1)
        }
    } else {
        None
    }
}

/// Populate a transition for `year`. A named transition fires at the
/// rule's moment with the rule's delta and letter; a simple transition
/// starts at the match start with the era's delta. The base offset
/// always comes from the era.
fn create_transition_for_year(
    year: i16,
    rule: Option<ZoneRuleBroker>,
    match_index: u8,
    zone_match: &ZoneMatch,
) -> Transition {
    let mut transition = Transition::empty();
    transition.match_index = match_index;
    transition.rule = rule;
    transition.offset_code = zone_match.era.offset_code();
    match rule {
        Some(rule) => {
            transition.transition_time = transition_time_for_year(year, rule);
            transition.delta_code = rule.delta_code();
            let letter = rule.letter();
            // '-' denotes "no letter" and stays an empty buffer; an
            // index (< 32) is resolved from the policy table later.
            if letter >= 32 && letter != b'-' {
                transition.letter_buf = single_letter(letter);
            }
        }
        None => {
            transition.transition_time = zone_match.start_date_time;
            transition.delta_code = zone_match.era.delta_code();
        }
    }
    transition
}

/// The moment a rule fires in `year`, in the clock its AT column is
/// authored against.
fn transition_time_for_year(year: i16, rule: ZoneRuleBroker) -> DateTuple {
    let month_day = utils::rule_month_day(
        year,
        rule.in_month(),
        rule.on_day_of_week(),
        rule.on_day_of_month(),
    );
    DateTuple::new(
        year,
        month_day.month,
        month_day.day,
        i16::from(rule.at_time_code()),
        rule.at_time_kind(),
    )
}

/// Coarse month-granular comparison with a month of slack on both
/// sides, used before transition times are expanded: a moment whose
/// exact relation to the match depends on unexpanded clock modes must
/// survive into the precise pass. Never returns [`MatchRelation::AtStart`].
fn compare_transition_to_match_fuzzy(
    transition: &Transition,
    zone_match: &ZoneMatch,
) -> MatchRelation {
    let months = |tuple: &DateTuple| i32::from(tuple.year) * 12 + i32::from(tuple.month);

    let transition_months = months(&transition.transition_time);
    if transition_months < months(&zone_match.start_date_time) - 1 {
        return MatchRelation::Before;
    }
    if months(&zone_match.until_date_time) + 2 <= transition_months {
        return MatchRelation::After;
    }
    MatchRelation::Within
}

/// Keep whichever of the current free agent and the reserved prior is
/// the most recent.
fn set_as_prior_transition<const CAP: usize>(storage: &mut TransitionStorage<CAP>) {
    let free = storage.free_agent_index();
    if storage.prior().is_valid_prior {
        let incoming_is_later = storage
            .prior()
            .transition_time
            .compare(&storage.transition(free).transition_time)
            == Ordering::Less;
        if !incoming_is_later {
            return;
        }
    }
    storage.transition_mut(free).is_valid_prior = true;
    storage.set_free_agent_as_prior();
}

/// Rewrite every transition time in `range` into wall mode, recording
/// the standard and universal shadows. The clock a rule's moment is
/// authored against resolves through the offset of the *previous*
/// transition; the first transition seeds with its own codes.
fn fix_transition_times<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    range: core::ops::Range<usize>,
) {
    let mut prev_codes: Option<(i8, i8)> = None;
    for index in range {
        let (offset_code, delta_code) = prev_codes.unwrap_or_else(|| {
            let first = storage.transition(index);
            (first.offset_code, first.delta_code)
        });
        let transition = storage.transition_mut(index);
        let (wall, standard, universal) = expand_date_tuple(
            transition.transition_time,
            i16::from(offset_code),
            i16::from(delta_code),
        );
        transition.transition_time = wall;
        transition.transition_time_std = standard;
        transition.transition_time_utc = universal;
        prev_codes = Some((transition.offset_code, transition.delta_code));
    }
}

/// Precise comparison of a transition against the match interval. The
/// transition time is read in whichever clock mode the compared match
/// boundary is authored against.
fn compare_transition_to_match(transition: &Transition, zone_match: &ZoneMatch) -> MatchRelation {
    let time_in_mode = |boundary: &DateTuple| match boundary.kind {
        TimeKind::Standard => &transition.transition_time_std,
        TimeKind::Universal => &transition.transition_time_utc,
        TimeKind::Wall => &transition.transition_time,
    };

    let start = &zone_match.start_date_time;
    match time_in_mode(start).compare(start) {
        Ordering::Less => return MatchRelation::Before,
        Ordering::Equal => return MatchRelation::AtStart,
        Ordering::Greater => {}
    }

    let until = &zone_match.until_date_time;
    if time_in_mode(until).compare(until) == Ordering::Less {
        MatchRelation::Within
    } else {
        MatchRelation::After
    }
}

/// Mark the candidates inside the match active, plus the single most
/// recent candidate before it, whose transition time is then slid up
/// to the match start.
fn select_active_transitions<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    zone_match: &ZoneMatch,
) {
    let mut prior: Option<usize> = None;
    for index in storage.candidate_range() {
        match compare_transition_to_match(storage.transition(index), zone_match) {
            MatchRelation::After => storage.transition_mut(index).active = false,
            MatchRelation::Within => storage.transition_mut(index).active = true,
            MatchRelation::AtStart => {
                // An exact hit on the match start supersedes any prior.
                if let Some(previous) = prior {
                    storage.transition_mut(previous).active = false;
                }
                storage.transition_mut(index).active = true;
                prior = Some(index);
            }
            MatchRelation::Before => match prior {
                Some(previous) => {
                    let later = storage
                        .transition(previous)
                        .transition_time
                        .compare(&storage.transition(index).transition_time)
                        == Ordering::Less;
                    if later {
                        storage.transition_mut(previous).active = false;
                        storage.transition_mut(index).active = true;
                        prior = Some(index);
                    } else {
                        storage.transition_mut(index).active = false;
                    }
                }
                None => {
                    storage.transition_mut(index).active = true;
                    prior = Some(index);
                }
            },
        }
    }

    if let Some(index) = prior {
        let transition = storage.transition_mut(index);
        transition.original_transition_time = Some(transition.transition_time);
        transition.transition_time = zone_match.start_date_time;
    }
}

/// Derive each interval's start and until in its own offset, and the
/// start instant in epoch seconds.
fn generate_start_until_times<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    matches: &[ZoneMatch],
) {
    let range = storage.active_range();
    if range.is_empty() {
        return;
    }

    let mut prev_index = range.start;
    let mut is_after_first = false;
    for index in range.clone() {
        let transition_time = storage.transition(index).transition_time;
        if is_after_first {
            storage.transition_mut(prev_index).until_date_time = transition_time;
        }

        let prev_offset = i16::from(storage.transition(prev_index).offset_code);
        let prev_delta = i16::from(storage.transition(prev_index).delta_code);
        let transition = storage.transition_mut(index);

        // The transition time is expressed in the previous interval's
        // offset; shift it into this interval's own offset.
        let code = transition_time.time_code - prev_offset - prev_delta
            + i16::from(transition.offset_code)
            + i16::from(transition.delta_code);
        transition.start_date_time = DateTuple::new(
            transition_time.year,
            transition_time.month,
            transition_time.day,
            code,
            transition_time.kind,
        )
        .normalized();

        // The normalised start is a legal date-time even when the raw
        // transition time encodes 24:00, so derive the epoch instant
        // from it with this interval's own offset.
        let start = transition.start_date_time;
        let offset_seconds = 900
            * i64::from(
                start.time_code
                    - i16::from(transition.offset_code)
                    - i16::from(transition.delta_code),
            );
        let days = i64::from(utils::local_days_from_civil(start.year, start.month, start.day));
        transition.start_epoch_seconds = days * utils::SECONDS_PER_DAY + offset_seconds;

        prev_index = index;
        is_after_first = true;
    }

    // The last interval runs to its match's until moment, expressed in
    // the interval's own clocks.
    let last = prev_index;
    let match_index = usize::from(storage.transition(last).match_index);
    let offset_code = i16::from(storage.transition(last).offset_code);
    let delta_code = i16::from(storage.transition(last).delta_code);
    let (wall, _, _) = expand_date_tuple(
        matches[match_index].until_date_time,
        offset_code,
        delta_code,
    );
    storage.transition_mut(last).until_date_time = wall;
}

/// Interpolate the abbreviation of every active transition.
fn calc_abbreviations<const CAP: usize>(
    storage: &mut TransitionStorage<CAP>,
    matches: &[ZoneMatch],
) {
    for index in storage.active_range() {
        let (format, delta_code, letter) = {
            let transition = storage.transition(index);
            let zone_match = &matches[usize::from(transition.match_index)];
            let letter: Option<TinyAsciiStr<LETTER_CAPACITY>> = transition
                .letter(zone_match)
                .map(|s| TinyAsciiStr::try_from_str(s).unwrap_or(empty_tiny()));
            (zone_match.era.format(), transition.delta_code, letter)
        };
        storage.transition_mut(index).abbrev = create_abbreviation(
            format,
            delta_code,
            letter.as_ref().map(TinyAsciiStr::as_str),
        );
    }
}

/// Build an abbreviation from an era's format template.
///
/// Without a letter (no rule was in force) the template is copied
/// verbatim. With one, a `%` slot is substituted (possibly with the
/// empty string), a `std/dst` pair is split on the daylight delta, and
/// any other template is copied verbatim. The result silently
/// truncates at the buffer capacity.
fn create_abbreviation(
    format: &str,
    delta_code: i8,
    letter: Option<&str>,
) -> TinyAsciiStr<ABBREV_CAPACITY> {
    let mut buffer = AbbrevBuffer::new();
    match letter {
        None => buffer.push_str(format),
        Some(letter) => {
            if format.as_bytes().contains(&b'%') {
                for &byte in format.as_bytes() {
                    if byte == b'%' {
                        buffer.push_str(letter);
                    } else {
                        buffer.push(byte);
                    }
                }
            } else if let Some((standard, daylight)) = format.split_once('/') {
                buffer.push_str(if delta_code == 0 { standard } else { daylight });
            } else {
                buffer.push_str(format);
            }
        }
    }
    buffer.finish()
}

struct AbbrevBuffer {
    bytes: [u8; ABBREV_CAPACITY],
    len: usize,
}

impl AbbrevBuffer {
    fn new() -> Self {
        Self {
            bytes: [0; ABBREV_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.len < ABBREV_CAPACITY {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    fn push_str(&mut self, s: &str) {
        for &byte in s.as_bytes() {
            self.push(byte);
        }
    }

    fn finish(self) -> TinyAsciiStr<ABBREV_CAPACITY> {
        match core::str::from_utf8(&self.bytes[..self.len]) {
            Ok(s) => TinyAsciiStr::try_from_str(s).unwrap_or(empty_tiny()),
            Err(_) => empty_tiny(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zonedb::data::{
        AFRICA_JOHANNESBURG, AMERICA_INDIANA_INDIANAPOLIS, AMERICA_LOS_ANGELES, AMERICA_ST_JOHNS,
        ETC_UTC, POLICY_US,
    };
    use crate::zonedb::{ZoneEra, ZonePolicyBroker};

    static ERA_MID_2018: ZoneEra = ZoneEra {
        offset_code: -32,
        policy: None,
        delta_code: 0,
        format: "",
        until_year_tiny: 18,
        until_month: 3,
        until_day: 11,
        until_time_code: 8,
        until_time_kind: TimeKind::Wall,
    };

    static ERA_JAN_2018: ZoneEra = ZoneEra {
        offset_code: -32,
        policy: None,
        delta_code: 0,
        format: "",
        until_year_tiny: 18,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    };

    #[test]
    fn era_to_year_month_comparison() {
        let mid = ZoneEraBroker::new(&ERA_MID_2018);
        assert_eq!(compare_era_to_year_month(mid, 2018, 3), Ordering::Greater);
        assert_eq!(compare_era_to_year_month(mid, 2018, 4), Ordering::Less);
        assert_eq!(compare_era_to_year_month(mid, 2019, 1), Ordering::Less);

        let jan = ZoneEraBroker::new(&ERA_JAN_2018);
        assert_eq!(compare_era_to_year_month(jan, 2018, 1), Ordering::Equal);
        assert_eq!(compare_era_to_year_month(jan, 2017, 12), Ordering::Greater);
    }

    #[test]
    fn match_creation_clamps_to_window() {
        let start_ym = YearMonth {
            year: 2017,
            month: 12,
        };
        let until_ym = YearMonth {
            year: 2019,
            month: 2,
        };
        let anchor = ZoneEraBroker::new(&ANCHOR_ERA);
        let era = ZoneEraBroker::new(&AMERICA_LOS_ANGELES.eras[0]);
        let zone_match = create_match(anchor, era, start_ym, until_ym);
        assert_eq!(
            zone_match.start_date_time,
            DateTuple::new(2017, 12, 1, 0, TimeKind::Wall)
        );
        assert_eq!(
            zone_match.until_date_time,
            DateTuple::new(2019, 2, 1, 0, TimeKind::Wall)
        );
    }

    #[test]
    fn interior_year_calculation() {
        let (years, count) = calc_interior_years(2002, 2004, 2001, 2005);
        assert_eq!(&years[..count], &[2002, 2003, 2004]);

        let (_, count) = calc_interior_years(1990, 1995, 2001, 2005);
        assert_eq!(count, 0);

        // Capped at the window's worst case.
        let (years, count) = calc_interior_years(2000, 2127, 1999, 2005);
        assert_eq!(&years[..count], &[2000, 2001, 2002, 2003]);
    }

    #[test]
    fn most_recent_prior_year_selection() {
        assert_eq!(most_recent_prior_year(1987, 2006, 2017), Some(2006));
        assert_eq!(most_recent_prior_year(2007, 2127, 2017), Some(2016));
        assert_eq!(most_recent_prior_year(2018, 2127, 2017), None);
        assert_eq!(most_recent_prior_year(2017, 2127, 2017), None);
    }

    #[test]
    fn fuzzy_comparison_keeps_a_month_of_slack() {
        let zone_match = ZoneMatch {
            start_date_time: DateTuple::new(2017, 12, 1, 0, TimeKind::Wall),
            until_date_time: DateTuple::new(2019, 2, 1, 0, TimeKind::Wall),
            era: ZoneEraBroker::new(&AMERICA_LOS_ANGELES.eras[0]),
        };
        let at = |year: i16, month: u8| {
            let mut transition = Transition::empty();
            transition.transition_time = DateTuple::new(year, month, 1, 0, TimeKind::Wall);
            transition
        };
        assert_eq!(
            compare_transition_to_match_fuzzy(&at(2017, 10), &zone_match),
            MatchRelation::Before
        );
        // One month before the start is within the slack.
        assert_eq!(
            compare_transition_to_match_fuzzy(&at(2017, 11), &zone_match),
            MatchRelation::Within
        );
        assert_eq!(
            compare_transition_to_match_fuzzy(&at(2019, 3), &zone_match),
            MatchRelation::Within
        );
        assert_eq!(
            compare_transition_to_match_fuzzy(&at(2019, 4), &zone_match),
            MatchRelation::After
        );
    }

    #[test]
    fn precise_comparison_follows_the_boundary_clock() {
        // A moment authored at 01:00 UT with a zero offset in force:
        // all three renditions name the same civil time.
        let mut transition = Transition::empty();
        let (wall, standard, universal) =
            expand_date_tuple(DateTuple::new(2018, 3, 25, 4, TimeKind::Universal), 0, 0);
        transition.transition_time = wall;
        transition.transition_time_std = standard;
        transition.transition_time_utc = universal;

        let era = ZoneEraBroker::new(&AMERICA_LOS_ANGELES.eras[0]);
        let match_with = |start: DateTuple, until: DateTuple| ZoneMatch {
            start_date_time: start,
            until_date_time: until,
            era,
        };

        // A universal-mode start boundary reads the universal shadow.
        let at_start = match_with(
            DateTuple::new(2018, 3, 25, 4, TimeKind::Universal),
            DateTuple::new(2018, 12, 1, 0, TimeKind::Wall),
        );
        assert_eq!(
            compare_transition_to_match(&transition, &at_start),
            MatchRelation::AtStart
        );

        // A standard-mode until boundary reads the standard shadow;
        // landing exactly on it is already outside the interval.
        let at_until = match_with(
            DateTuple::new(2018, 1, 1, 0, TimeKind::Universal),
            DateTuple::new(2018, 3, 25, 4, TimeKind::Standard),
        );
        assert_eq!(
            compare_transition_to_match(&transition, &at_until),
            MatchRelation::After
        );

        let inside = match_with(
            DateTuple::new(2018, 1, 1, 0, TimeKind::Standard),
            DateTuple::new(2018, 12, 1, 0, TimeKind::Universal),
        );
        assert_eq!(
            compare_transition_to_match(&transition, &inside),
            MatchRelation::Within
        );
    }

    #[test]
    fn rule_firing_moment() {
        let policy = ZoneEraBroker::new(&AMERICA_LOS_ANGELES.eras[0])
            .zone_policy()
            .expect("era names a policy");
        // Second Sunday of March 2018 at 02:00 wall.
        assert_eq!(
            transition_time_for_year(2018, policy.rule(2)),
            DateTuple::new(2018, 3, 11, 8, TimeKind::Wall)
        );
        // First Sunday of November 2018.
        assert_eq!(
            transition_time_for_year(2018, policy.rule(3)),
            DateTuple::new(2018, 11, 4, 8, TimeKind::Wall)
        );
    }

    #[test]
    fn abbreviation_interpolation() {
        let abbrev =
            |format: &str, delta: i8, letter: Option<&str>| create_abbreviation(format, delta, letter);

        // No rule in force: the template is copied verbatim.
        assert_eq!(abbrev("EST", 0, None).as_str(), "EST");
        assert_eq!(abbrev("P%T", 4, None).as_str(), "P%T");

        // Letter substitution, including the empty letter.
        assert_eq!(abbrev("P%T", 0, Some("S")).as_str(), "PST");
        assert_eq!(abbrev("P%T", 4, Some("D")).as_str(), "PDT");
        assert_eq!(abbrev("N%T", 8, Some("DD")).as_str(), "NDDT");
        assert_eq!(abbrev("%", 0, Some("CAT")).as_str(), "CAT");
        assert_eq!(abbrev("GMT%", 0, Some("")).as_str(), "GMT");
        assert_eq!(abbrev("%", 0, Some("")).as_str(), "");

        // std/dst pair split on the daylight delta.
        assert_eq!(abbrev("GMT/BST", 0, Some("")).as_str(), "GMT");
        assert_eq!(abbrev("GMT/BST", 4, Some("")).as_str(), "BST");

        // Neither '%' nor '/': verbatim even with a rule in force.
        assert_eq!(abbrev("SAST", 4, Some("")).as_str(), "SAST");

        // Silent truncation at the buffer capacity.
        assert_eq!(abbrev("ABCDEFGHIJ", 0, None).as_str(), "ABCDEFGH");
    }

    fn active_transitions<const CAP: usize>(
        processor: &ZoneProcessor<CAP>,
    ) -> alloc::vec::Vec<Transition> {
        processor
            .storage
            .active_range()
            .map(|i| *processor.storage.transition(i))
            .collect()
    }

    #[test]
    fn los_angeles_2018_pipeline_invariants() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_LOS_ANGELES);
        processor.init_for_year(2018).unwrap();
        assert_eq!(processor.num_matches, 1);
        assert!(!processor.matches_overflowed());
        assert!(processor.transition_high_water() <= MAX_TRANSITIONS);

        let active = active_transitions(&processor);
        assert_eq!(active.len(), 3);

        // Strictly ordered by transition time, mode-agnostic.
        for pair in active.windows(2) {
            assert_eq!(
                pair[0].transition_time.compare(&pair[1].transition_time),
                Ordering::Less
            );
        }

        // Adjacent intervals cover the same instant: the previous
        // until (in its own offset) and the next start (in its own
        // offset) agree once shifted to epoch seconds.
        for pair in active.windows(2) {
            let until = pair[0].until_date_time;
            let until_epoch = i64::from(utils::local_days_from_civil(
                until.year, until.month, until.day,
            )) * utils::SECONDS_PER_DAY
                + 900
                    * i64::from(
                        until.time_code
                            - i16::from(pair[0].offset_code)
                            - i16::from(pair[0].delta_code),
                    );
            assert_eq!(until_epoch, pair[1].start_epoch_seconds);
        }

        // Base offset from the era, delta from the rule.
        for transition in &active {
            assert_eq!(transition.offset_code, -32);
            let rule = transition.rule.expect("named transitions only");
            assert_eq!(transition.delta_code, rule.delta_code());
        }

        // The winter prior slid up to the window start keeps its
        // original firing moment for diagnostics.
        let prior = &active[0];
        assert_eq!(
            prior.original_transition_time,
            Some(DateTuple::new(2017, 11, 5, 8, TimeKind::Wall))
        );
        assert_eq!(prior.abbrev.as_str(), "PST");
        assert_eq!(active[1].abbrev.as_str(), "PDT");
        assert_eq!(active[2].abbrev.as_str(), "PST");

        // The springtime start, shifted into its own offset.
        assert_eq!(
            active[1].start_date_time,
            DateTuple::new(2018, 3, 11, 12, TimeKind::Wall)
        );
        assert_eq!(active[1].start_epoch_seconds, 574_077_600);
    }

    #[test]
    fn indianapolis_2006_resolves_both_eras() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_INDIANA_INDIANAPOLIS);
        processor.init_for_year(2006).unwrap();
        assert_eq!(processor.num_matches, 2);

        let active = active_transitions(&processor);
        assert_eq!(active.len(), 4);
        // Era-driven EST tail of 2005, then the rule-driven 2006.
        assert!(active[0].rule.is_none());
        assert_eq!(active[0].abbrev.as_str(), "EST");
        assert_eq!(active[1].abbrev.as_str(), "EST");
        assert_eq!(active[2].abbrev.as_str(), "EDT");
        assert_eq!(active[3].abbrev.as_str(), "EST");

        // Daylight saving began 2006-04-02T02:00 EST = 07:00Z.
        assert_eq!(active[2].start_epoch_seconds, 197_276_400);
    }

    #[test]
    fn st_johns_truncated_midnight_transition() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_ST_JOHNS);
        processor.init_for_year(2007).unwrap();

        let active = active_transitions(&processor);
        assert_eq!(active.len(), 3);
        assert_eq!(active[0].abbrev.as_str(), "NST");
        assert_eq!(active[1].abbrev.as_str(), "NDT");
        assert_eq!(active[2].abbrev.as_str(), "NST");

        // Nominally 00:01 local; the quantised database fires it at
        // exactly 00:00 NST = 03:30Z.
        assert_eq!(active[1].start_epoch_seconds, 226_899_000);
        assert_eq!(
            active[1].start_date_time,
            DateTuple::new(2007, 3, 11, 4, TimeKind::Wall)
        );
    }

    #[test]
    fn single_era_zone_has_one_transition() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&ETC_UTC);
        processor.init_for_year(2020).unwrap();
        let active = active_transitions(&processor);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].abbrev.as_str(), "UTC");
        assert_eq!(active[0].offset_code, 0);
    }

    #[test]
    fn year_cache_is_reused_and_invalidated() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_LOS_ANGELES);
        processor.init_for_year(2018).unwrap();
        assert!(processor.is_filled);

        // Same year: memoised.
        processor.init_for_year(2018).unwrap();
        assert_eq!(processor.year, 2018);

        // Different year: refilled.
        processor.init_for_year(2019).unwrap();
        assert_eq!(processor.year, 2019);

        // The high-water mark can be zeroed without touching the memo.
        assert!(processor.transition_high_water() > 0);
        processor.reset_transition_high_water();
        assert_eq!(processor.transition_high_water(), 0);
        assert!(processor.is_filled);

        // Rebinding clears the memo.
        processor.set_zone_info(&AMERICA_ST_JOHNS);
        assert!(!processor.is_filled);
        assert_eq!(processor.zone_id(), AMERICA_ST_JOHNS.zone_id);
    }

    #[test]
    fn out_of_range_years_fail_without_filling() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_LOS_ANGELES);
        let err = processor.init_for_year(1900).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Range);
        assert!(!processor.is_filled);

        // One year before the window start is still allowed.
        processor.init_for_year(1979).unwrap();
        assert!(processor.is_filled);
        assert!(processor.init_for_year(2051).is_err());
    }

    #[test]
    fn johannesburg_wartime_daylight() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AFRICA_JOHANNESBURG);
        processor.init_for_year(1942).unwrap();
        let active = active_transitions(&processor);
        assert_eq!(active.len(), 1);
        // The only transition in the window is the September shift.
        assert_eq!(active[0].delta_code, 4);
        assert_eq!(active[0].abbrev.as_str(), "SAST");
    }

    #[test]
    fn letter_table_flows_into_abbreviation() {
        let mut processor: ZoneProcessor = ZoneProcessor::new(&AMERICA_ST_JOHNS);
        // 1988-07-01T00:00:00Z, inside Newfoundland's double daylight.
        processor.init_for_epoch(-362_966_400).unwrap();
        let transition = processor.storage.find_transition(-362_966_400).unwrap();
        assert_eq!(transition.abbrev.as_str(), "NDDT");
        assert_eq!(transition.delta_code, 8);
    }

    #[test]
    fn policy_rules_are_reachable_through_the_broker() {
        let policy: ZonePolicyBroker = ZoneEraBroker::new(&AMERICA_LOS_ANGELES.eras[0])
            .zone_policy()
            .expect("era names a policy");
        assert_eq!(policy.num_rules(), POLICY_US.rules.len());
    }
}
