//! Time expressions: turn a phrase such as `"6:10 pm"` into the next instant
//! showing that wall-clock time.
//!
//! Grammar: an hour of one or two digits, an optional minute separated by `:`
//! or `.`, then an optional `am`/`pm` marker (case-insensitive, optional
//! whitespace before it). Text around the match is ignored, so
//! `"around 7.30PM please"` parses as 19:30.
//!
//! A bare hour without a marker is read on the 24-hour clock: `"6"` is 06:00,
//! not 18:00.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]{1,2})(?:[:.]([0-9]{1,2}))?\s*(am|pm)?")
        .expect("time expression pattern is valid")
});

/// Why a fragment could not be turned into an instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("no hour found in time expression")]
    MissingHour,

    #[error("{hour:02}:{minute:02} is not a valid time of day")]
    OutOfRange { hour: u32, minute: u32 },

    #[error("local time {0} does not exist")]
    NonexistentLocalTime(NaiveDateTime),
}

/// 12-hour clock marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Hour and minute extracted from a fragment, normalized to the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimeFragment {
    pub hour: u32,
    pub minute: u32,
}

impl ParsedTimeFragment {
    /// Extract and normalize the first time-of-day found in `fragment`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::MissingHour`] when the fragment has no digits,
    /// and [`TimeParseError::OutOfRange`] when the normalized values are not a
    /// valid time of day (e.g. `"25"` or `"7:75"`).
    pub fn extract(fragment: &str) -> Result<Self, TimeParseError> {
        let caps = TIME_RE.captures(fragment).ok_or(TimeParseError::MissingHour)?;

        let hour = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or(TimeParseError::MissingHour)?;
        let minute = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0);
        let meridiem = caps.get(3).map(|m| {
            if m.as_str().eq_ignore_ascii_case("pm") {
                Meridiem::Pm
            } else {
                Meridiem::Am
            }
        });

        let hour = match meridiem {
            Some(Meridiem::Pm) if hour < 12 => hour + 12,
            Some(Meridiem::Am) if hour == 12 => 0,
            _ => hour,
        };

        if hour > 23 || minute > 59 {
            return Err(TimeParseError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// The first instant strictly after `now` whose wall-clock time is
    /// `hour:minute:00`.
    ///
    /// Today's candidate is used when it is still ahead; otherwise (including
    /// when it equals `now`, or when today's occurrence was skipped by a DST
    /// gap that is already behind) the same time on the next calendar day.
    /// A time repeated by a fall-back transition resolves to its earliest
    /// occurrence that is still ahead.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::NonexistentLocalTime`] when the wall-clock
    /// time is skipped by a DST gap later today, or on the next day when the
    /// rollover lands in one.
    pub fn next_occurrence<Tz: TimeZone>(
        self,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>, TimeParseError> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or(
            TimeParseError::OutOfRange {
                hour: self.hour,
                minute: self.minute,
            },
        )?;
        let tz = now.timezone();
        let today = now.date_naive().and_time(time);
        let mapped = tz.from_local_datetime(&today);

        if mapped.clone().earliest().is_none() && today > now.naive_local() {
            return Err(TimeParseError::NonexistentLocalTime(today));
        }
        if let Some(candidate) = [mapped.clone().earliest(), mapped.latest()]
            .into_iter()
            .flatten()
            .find(|candidate| candidate > now)
        {
            return Ok(candidate);
        }

        let tomorrow = today
            .date()
            .succ_opt()
            .ok_or(TimeParseError::NonexistentLocalTime(today))?;
        localize(&tz, tomorrow.and_time(time))
    }
}

/// Resolve `fragment` against `now` into the next matching instant.
///
/// # Errors
///
/// See [`ParsedTimeFragment::extract`] and [`ParsedTimeFragment::next_occurrence`].
pub fn parse<Tz: TimeZone>(
    fragment: &str,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>, TimeParseError> {
    ParsedTimeFragment::extract(fragment)?.next_occurrence(now)
}

fn localize<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
) -> Result<DateTime<Tz>, TimeParseError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or(TimeParseError::NonexistentLocalTime(naive))
}
