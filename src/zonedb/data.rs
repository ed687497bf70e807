//! A hand-compiled snapshot of a handful of real zones.
//!
//! The entries mirror the TZ Database source for the declared
//! `[start_year, until_year]` windows: rules made irrelevant by a
//! window are omitted, abbreviation templates collapse `%s` to `%`, and
//! transition times are quantised to 15-minute units. The StJohns
//! policy keeps the database's historical quantisation of its 00:01
//! transitions down to 00:00.
//!
//! Letters that are longer than one character ("DD") live in the
//! policy's letter table and are referenced by index from the rule.

use crate::zonedb::{zone_identifier, TimeKind, ZoneEra, ZoneInfo, ZonePolicy, ZoneRule};

/// United States daylight saving rules, 1967 onwards.
pub static POLICY_US: ZonePolicy = ZonePolicy {
    rules: &[
        // 1967-2006: last Sunday of October, back to standard time.
        ZoneRule {
            from_year_tiny: -33,
            to_year_tiny: 6,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
        // 1987-2006: first Sunday of April, forward one hour.
        ZoneRule {
            from_year_tiny: -13,
            to_year_tiny: 6,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 2007-: second Sunday of March, forward one hour.
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 127,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 8,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 2007-: first Sunday of November, back to standard time.
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 127,
            in_month: 11,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
    ],
    letters: &[],
};

/// Canadian daylight saving rules, 1974 onwards.
pub static POLICY_CANADA: ZonePolicy = ZonePolicy {
    rules: &[
        ZoneRule {
            from_year_tiny: -26,
            to_year_tiny: 6,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
        ZoneRule {
            from_year_tiny: -13,
            to_year_tiny: 6,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 127,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 8,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 127,
            in_month: 11,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
    ],
    letters: &[],
};

/// Newfoundland's own rules through 2011, including the 1988
/// double-daylight year. The historical 00:01 transition times are
/// stored quantised to 00:00.
pub static POLICY_STJOHNS: ZonePolicy = ZonePolicy {
    rules: &[
        // 1987 only: first Sunday of April, forward one hour.
        ZoneRule {
            from_year_tiny: -13,
            to_year_tiny: -13,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 1987-2006: last Sunday of October, back to standard time.
        ZoneRule {
            from_year_tiny: -13,
            to_year_tiny: 6,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
        // 1988 only: double daylight, letter table entry "DD".
        ZoneRule {
            from_year_tiny: -12,
            to_year_tiny: -12,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 8,
            letter: 0,
        },
        // 1989-2006: first Sunday of April, forward one hour.
        ZoneRule {
            from_year_tiny: -11,
            to_year_tiny: 6,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 2007-2011: second Sunday of March, forward one hour.
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 11,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 8,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 2007-2010: first Sunday of November, back to standard time.
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 10,
            in_month: 11,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 0,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'S',
        },
    ],
    letters: &["DD"],
};

/// European Union daylight rules as observed since the 1990s. The
/// moments are authored in universal time.
pub static POLICY_EU: ZonePolicy = ZonePolicy {
    rules: &[
        // 1981-: last Sunday of March at 01:00 UT, forward one hour.
        ZoneRule {
            from_year_tiny: -19,
            to_year_tiny: 127,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 4,
            at_time_kind: TimeKind::Universal,
            delta_code: 4,
            letter: b'S',
        },
        // 1996-: last Sunday of October at 01:00 UT, back to standard.
        ZoneRule {
            from_year_tiny: -4,
            to_year_tiny: 127,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 4,
            at_time_kind: TimeKind::Universal,
            delta_code: 0,
            letter: b'-',
        },
    ],
    letters: &[],
};

/// New South Wales daylight rules since the late 1980s. The moments
/// are authored in local standard time, except the Sydney Olympics
/// adjustment of 2000.
pub static POLICY_AN: ZonePolicy = ZonePolicy {
    rules: &[
        // 1987-1999: last Sunday of October, forward one hour.
        ZoneRule {
            from_year_tiny: -13,
            to_year_tiny: -1,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 4,
            letter: b'D',
        },
        // 1996-2005: last Sunday of March, back to standard.
        ZoneRule {
            from_year_tiny: -4,
            to_year_tiny: 5,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 0,
            letter: b'S',
        },
        // 2000 only: daylight began early for the Olympics, at wall
        // time.
        ZoneRule {
            from_year_tiny: 0,
            to_year_tiny: 0,
            in_month: 8,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'D',
        },
        // 2001-2007: last Sunday of October, forward one hour.
        ZoneRule {
            from_year_tiny: 1,
            to_year_tiny: 7,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 4,
            letter: b'D',
        },
        // 2006 only: back to standard on the first Sunday of April.
        ZoneRule {
            from_year_tiny: 6,
            to_year_tiny: 6,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 0,
            letter: b'S',
        },
        // 2007 only: back to standard on the last Sunday of March.
        ZoneRule {
            from_year_tiny: 7,
            to_year_tiny: 7,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 0,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 0,
            letter: b'S',
        },
        // 2008-: first Sunday of April, back to standard.
        ZoneRule {
            from_year_tiny: 8,
            to_year_tiny: 127,
            in_month: 4,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 0,
            letter: b'S',
        },
        // 2008-: first Sunday of October, forward one hour.
        ZoneRule {
            from_year_tiny: 8,
            to_year_tiny: 127,
            in_month: 10,
            on_day_of_week: 7,
            on_day_of_month: 1,
            at_time_code: 8,
            at_time_kind: TimeKind::Standard,
            delta_code: 4,
            letter: b'D',
        },
    ],
    letters: &[],
};

/// South African wartime daylight rules, 1942-1944.
pub static POLICY_SA: ZonePolicy = ZonePolicy {
    rules: &[
        ZoneRule {
            from_year_tiny: -58,
            to_year_tiny: -57,
            in_month: 9,
            on_day_of_week: 7,
            on_day_of_month: 15,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 4,
            letter: b'-',
        },
        ZoneRule {
            from_year_tiny: -57,
            to_year_tiny: -56,
            in_month: 3,
            on_day_of_week: 7,
            on_day_of_month: 15,
            at_time_code: 8,
            at_time_kind: TimeKind::Wall,
            delta_code: 0,
            letter: b'-',
        },
    ],
    letters: &[],
};

pub static AMERICA_LOS_ANGELES: ZoneInfo = ZoneInfo {
    name: "America/Los_Angeles",
    zone_id: zone_identifier("America/Los_Angeles"),
    start_year: 1980,
    until_year: 2050,
    eras: &[ZoneEra {
        offset_code: -32,
        policy: Some(&POLICY_US),
        delta_code: 0,
        format: "P%T",
        until_year_tiny: 127,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    }],
};

pub static AMERICA_NEW_YORK: ZoneInfo = ZoneInfo {
    name: "America/New_York",
    zone_id: zone_identifier("America/New_York"),
    start_year: 1980,
    until_year: 2050,
    eras: &[ZoneEra {
        offset_code: -20,
        policy: Some(&POLICY_US),
        delta_code: 0,
        format: "E%T",
        until_year_tiny: 127,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    }],
};

pub static AMERICA_INDIANA_INDIANAPOLIS: ZoneInfo = ZoneInfo {
    name: "America/Indiana/Indianapolis",
    zone_id: zone_identifier("America/Indiana/Indianapolis"),
    start_year: 1980,
    until_year: 2050,
    eras: &[
        // No daylight saving observed through 2005.
        ZoneEra {
            offset_code: -20,
            policy: None,
            delta_code: 0,
            format: "EST",
            until_year_tiny: 6,
            until_month: 1,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
        ZoneEra {
            offset_code: -20,
            policy: Some(&POLICY_US),
            delta_code: 0,
            format: "E%T",
            until_year_tiny: 127,
            until_month: 1,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
    ],
};

pub static AMERICA_ST_JOHNS: ZoneInfo = ZoneInfo {
    name: "America/St_Johns",
    zone_id: zone_identifier("America/St_Johns"),
    start_year: 1980,
    until_year: 2050,
    eras: &[
        ZoneEra {
            offset_code: -14,
            policy: Some(&POLICY_STJOHNS),
            delta_code: 0,
            format: "N%T",
            until_year_tiny: 11,
            until_month: 11,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
        ZoneEra {
            offset_code: -14,
            policy: Some(&POLICY_CANADA),
            delta_code: 0,
            format: "N%T",
            until_year_tiny: 127,
            until_month: 1,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
    ],
};

pub static AFRICA_JOHANNESBURG: ZoneInfo = ZoneInfo {
    name: "Africa/Johannesburg",
    zone_id: zone_identifier("Africa/Johannesburg"),
    start_year: 1940,
    until_year: 2050,
    eras: &[
        ZoneEra {
            offset_code: 6,
            policy: None,
            delta_code: 0,
            format: "SAST",
            until_year_tiny: -97,
            until_month: 3,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
        ZoneEra {
            offset_code: 8,
            policy: Some(&POLICY_SA),
            delta_code: 0,
            format: "SAST",
            until_year_tiny: 127,
            until_month: 1,
            until_day: 1,
            until_time_code: 0,
            until_time_kind: TimeKind::Wall,
        },
    ],
};

pub static EUROPE_LONDON: ZoneInfo = ZoneInfo {
    name: "Europe/London",
    zone_id: zone_identifier("Europe/London"),
    start_year: 1997,
    until_year: 2050,
    eras: &[ZoneEra {
        offset_code: 0,
        policy: Some(&POLICY_EU),
        delta_code: 0,
        format: "GMT/BST",
        until_year_tiny: 127,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    }],
};

pub static AUSTRALIA_SYDNEY: ZoneInfo = ZoneInfo {
    name: "Australia/Sydney",
    zone_id: zone_identifier("Australia/Sydney"),
    start_year: 1990,
    until_year: 2050,
    eras: &[ZoneEra {
        offset_code: 40,
        policy: Some(&POLICY_AN),
        delta_code: 0,
        format: "AE%T",
        until_year_tiny: 127,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    }],
};

pub static ETC_UTC: ZoneInfo = ZoneInfo {
    name: "Etc/UTC",
    zone_id: zone_identifier("Etc/UTC"),
    start_year: 1940,
    until_year: 2100,
    eras: &[ZoneEra {
        offset_code: 0,
        policy: None,
        delta_code: 0,
        format: "UTC",
        until_year_tiny: 127,
        until_month: 1,
        until_day: 1,
        until_time_code: 0,
        until_time_kind: TimeKind::Wall,
    }],
};

/// Every zone in this snapshot, ordered by identifier.
pub static ZONE_REGISTRY: [&ZoneInfo; 8] = [
    &AFRICA_JOHANNESBURG,
    &AMERICA_INDIANA_INDIANAPOLIS,
    &AMERICA_LOS_ANGELES,
    &AMERICA_NEW_YORK,
    &AMERICA_ST_JOHNS,
    &AUSTRALIA_SYDNEY,
    &ETC_UTC,
    &EUROPE_LONDON,
];
