//! Local calendar day windows and date parameter parsing.
//!
//! A [`LocalDay`] is the half-open interval `[00:00, next 00:00)` of one calendar date in one
//! time zone. Both boundaries must map to exactly one instant; dates whose local midnight is
//! skipped or repeated by a DST transition are rejected instead of being shifted.

use crate::{Error, Result};
use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Half-open local day window `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDay<Tz: TimeZone> {
    date: NaiveDate,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl<Tz: TimeZone> LocalDay<Tz> {
    /// Creates the window for `date` in `zone`.
    ///
    /// # Errors
    /// Returns `AmbiguousLocalMidnight` or `NonexistentLocalMidnight` if either the start of
    /// `date` or the start of the following date is not a unique local instant, and
    /// `InvalidCalendarDate` if `date` is the last representable date.
    ///
    /// # Example
    /// ```
    /// # use sun_times::time::LocalDay;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    /// let day = LocalDay::new(date, &chrono_tz::Europe::Vienna).unwrap();
    /// // DST starts at 02:00, so this day is one hour short
    /// assert_eq!((day.end_utc() - day.start_utc()).num_hours(), 23);
    /// ```
    pub fn new(date: NaiveDate, zone: &Tz) -> Result<Self> {
        let next = date
            .succ_opt()
            .ok_or_else(|| Error::InvalidCalendarDate {
                value: date.to_string(),
            })?;
        let start = local_midnight(date, zone)?;
        let end = local_midnight(next, zone)?;
        Ok(Self { date, start, end })
    }

    /// Calendar date of the window.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Local start of day (inclusive).
    #[must_use]
    pub const fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// Local start of the next day (exclusive).
    #[must_use]
    pub const fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Start of the window as a UTC instant.
    #[must_use]
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    /// End of the window as a UTC instant.
    #[must_use]
    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// Instant halfway through the window.
    #[must_use]
    pub fn midpoint_utc(&self) -> DateTime<Utc> {
        let start = self.start_utc();
        start + (self.end_utc() - start) / 2
    }

    /// Whether `instant` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start_utc() && *instant < self.end_utc()
    }
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, zone: &Tz) -> Result<DateTime<Tz>> {
    match zone.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
        LocalResult::Single(start) => Ok(start),
        LocalResult::Ambiguous(..) => Err(Error::AmbiguousLocalMidnight { date }),
        LocalResult::None => Err(Error::NonexistentLocalMidnight { date }),
    }
}

/// Parses the `day` request parameter into the local calendar date it designates.
///
/// Accepted forms:
/// - `YYYYMMDD`
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DDTHH:MM:SS` (time of day is discarded)
/// - RFC 3339 timestamp with offset (converted to `zone` before taking the date)
///
/// # Errors
/// Returns `InvalidCalendarDate` for well-formed values naming an impossible date such as
/// `20240230`, and `MalformedDay` for anything else.
///
/// # Example
/// ```
/// # use sun_times::time::parse_day;
/// use chrono::NaiveDate;
///
/// let zone = chrono_tz::America::New_York;
/// let expected = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
/// assert_eq!(parse_day("20240621", &zone).unwrap(), expected);
/// assert_eq!(parse_day("2024-06-21", &zone).unwrap(), expected);
/// // 02:00 UTC on the 22nd is still the 21st in New York
/// assert_eq!(parse_day("2024-06-22T02:00:00Z", &zone).unwrap(), expected);
/// assert!(parse_day("20240230", &zone).is_err());
/// ```
pub fn parse_day<Tz: TimeZone>(input: &str, zone: &Tz) -> Result<NaiveDate> {
    let value = input.trim();

    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return compact_date(value).ok_or_else(|| Error::InvalidCalendarDate {
            value: value.to_owned(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::<FixedOffset>::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(zone).date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    if looks_like_iso_date(value) {
        return Err(Error::InvalidCalendarDate {
            value: value.to_owned(),
        });
    }
    Err(Error::MalformedDay {
        value: value.to_owned(),
    })
}

fn compact_date(value: &str) -> Option<NaiveDate> {
    let year = value.get(0..4)?.parse().ok()?;
    let month = value.get(4..6)?.parse().ok()?;
    let day = value.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// `YYYY-MM-DD` prefix with digits in the right places, e.g. `2023-02-29`.
fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Today's calendar date in `zone`.
#[must_use]
pub fn today_in<Tz: TimeZone>(zone: &Tz) -> NaiveDate {
    Utc::now().with_timezone(zone).date_naive()
}
