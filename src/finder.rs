//! Sunrise/sunset classification of threshold crossings over a local day.
//!
//! Crossings are folded in chronological order against the phase that precedes them. A crossing
//! into a brighter phase is a sunrise event named after the phase entered; a crossing into a
//! darker phase is a sunset event named after the phase being left. "Civil sunrise" therefore
//! marks the start of civil-or-brighter and "civil sunset" the end of it.

use crate::ephemeris::Ephemeris;
use crate::time::LocalDay;
use crate::types::{CrossingEvent, DayOutcome, Location, Phase, SunTimes};
use crate::{Error, Result};
use chrono::TimeZone;

/// Finds and classifies the solar threshold crossings of one local day.
#[derive(Debug)]
pub struct SolarEventFinder<'a, E: Ephemeris + ?Sized> {
    ephemeris: &'a E,
}

impl<E: Ephemeris + ?Sized> Clone for SolarEventFinder<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Ephemeris + ?Sized> Copy for SolarEventFinder<'_, E> {}

impl<'a, E: Ephemeris + ?Sized> SolarEventFinder<'a, E> {
    /// Creates a finder backed by `ephemeris`.
    #[must_use]
    pub const fn new(ephemeris: &'a E) -> Self {
        Self { ephemeris }
    }

    /// Phase in effect at the start of `day`.
    ///
    /// # Errors
    /// Propagates ephemeris errors.
    pub fn initial_phase<Tz: TimeZone>(
        &self,
        location: &Location,
        day: &LocalDay<Tz>,
    ) -> Result<Phase> {
        self.ephemeris.phase_at(location, day.start_utc())
    }

    /// All crossings inside `day`, in chronological order.
    ///
    /// # Errors
    /// Propagates ephemeris errors, and returns `Computation` if the ephemeris reports
    /// crossings out of chronological order.
    pub fn find_crossings<Tz: TimeZone>(
        &self,
        location: &Location,
        day: &LocalDay<Tz>,
    ) -> Result<Vec<CrossingEvent>> {
        let events: Vec<CrossingEvent> = self
            .ephemeris
            .crossings(location, day.start_utc(), day.end_utc())?
            .into_iter()
            .filter(|event| day.contains(&event.instant))
            .collect();

        if events.windows(2).any(|w| w[0].instant >= w[1].instant) {
            return Err(Error::computation(
                "ephemeris returned crossings out of chronological order",
            ));
        }
        Ok(events)
    }

    /// Sunrise/sunset times for `day`, or the phase the sun stays in if nothing is crossed.
    ///
    /// The day's crossings are classified against the phase at the start of the day. When
    /// there are none, the sun's phase at the middle of the day describes the whole day.
    ///
    /// # Errors
    /// Propagates ephemeris errors.
    pub fn sun_times<Tz: TimeZone>(
        &self,
        location: &Location,
        day: &LocalDay<Tz>,
    ) -> Result<DayOutcome<Tz>> {
        let events = self.find_crossings(location, day)?;
        if events.is_empty() {
            let phase = self.ephemeris.phase_at(location, day.midpoint_utc())?;
            return Ok(DayOutcome::Continuous(phase));
        }

        let initial = self.initial_phase(location, day)?;
        let zone = day.start().timezone();
        Ok(DayOutcome::Crossings(classify(initial, &events, &zone)))
    }
}

/// Folds chronological crossings into sunrise and sunset times.
///
/// `initial` is the phase before the first event. Events that do not change the phase are
/// ignored. If the same key is reached twice in one day, the later time wins.
///
/// # Example
/// ```
/// # use sun_times::{classify, CrossingEvent, Phase};
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 3, 20, h, 0, 0).unwrap();
/// let events = [
///     CrossingEvent::new(at(6), Phase::Full),
///     CrossingEvent::new(at(18), Phase::Civil),
/// ];
/// let times = classify(Phase::Civil, &events, &Utc);
///
/// assert_eq!(times.sunrise.get(Phase::Full), Some(&at(6)));
/// // leaving `full` is the apparent sunset
/// assert_eq!(times.sunset.get(Phase::Full), Some(&at(18)));
/// assert_eq!(times.sunset.get(Phase::Civil), None);
/// ```
pub fn classify<Tz: TimeZone>(
    initial: Phase,
    events: &[CrossingEvent],
    zone: &Tz,
) -> SunTimes<Tz> {
    let mut times = SunTimes::default();
    let mut previous = initial;

    for event in events {
        let local = event.instant.with_timezone(zone);
        if event.phase > previous {
            times.sunrise.insert(event.phase, local);
        } else if event.phase < previous {
            times.sunset.insert(previous, local);
        } else {
            continue;
        }
        previous = event.phase;
    }
    times
}
