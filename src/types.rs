//! Core data types for twilight phase calculations.

use crate::Result;
use crate::error::check_coordinates;
use chrono::{DateTime, TimeZone, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use solar_positioning::Horizon;

/// Geographic observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location from latitude and longitude in degrees.
    ///
    /// # Errors
    /// Returns `InvalidLatitude` or `InvalidLongitude` for out-of-range coordinates.
    ///
    /// # Example
    /// ```
    /// # use sun_times::Location;
    /// let vienna = Location::new(48.21, 16.37).unwrap();
    /// assert_eq!(vienna.latitude(), 48.21);
    /// assert!(Location::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees (-90 to +90).
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees (-180 to +180).
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Sky brightness band determined by the sun's altitude.
///
/// Variants are declared from darkest to brightest, so the derived ordering is the ordering
/// used to tell rising events from setting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Sun more than 18° below the horizon
    Dark,
    /// Sun between 18° and 12° below the horizon
    Astronomical,
    /// Sun between 12° and 6° below the horizon
    Nautical,
    /// Sun between 6° below the horizon and apparent sunrise/sunset
    Civil,
    /// Sun above the apparent horizon (daylight)
    Full,
}

impl Phase {
    /// All phases, darkest first.
    pub const ALL: [Self; 5] = [
        Self::Dark,
        Self::Astronomical,
        Self::Nautical,
        Self::Civil,
        Self::Full,
    ];

    /// Name used as a key in sunrise/sunset results.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Astronomical => "astronomical",
            Self::Nautical => "nautical",
            Self::Civil => "civil",
            Self::Full => "full",
        }
    }

    /// Numeric index, 0 (dark) to 4 (full).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Phase for a numeric index, if in range.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Dark),
            1 => Some(Self::Astronomical),
            2 => Some(Self::Nautical),
            3 => Some(Self::Civil),
            4 => Some(Self::Full),
            _ => None,
        }
    }

    /// The horizon whose crossing marks the lower edge of this phase.
    ///
    /// `Dark` is unbounded below and has none.
    #[must_use]
    pub const fn lower_horizon(self) -> Option<Horizon> {
        match self {
            Self::Dark => None,
            Self::Astronomical => Some(Horizon::AstronomicalTwilight),
            Self::Nautical => Some(Horizon::NauticalTwilight),
            Self::Civil => Some(Horizon::CivilTwilight),
            Self::Full => Some(Horizon::SunriseSunset),
        }
    }

    /// Classifies a geometric solar altitude in degrees.
    ///
    /// Each phase includes its lower bound. Non-finite altitudes classify as `Dark`.
    ///
    /// # Example
    /// ```
    /// # use sun_times::Phase;
    /// assert_eq!(Phase::from_altitude(-6.0), Phase::Civil);
    /// assert_eq!(Phase::from_altitude(-6.0001), Phase::Nautical);
    /// assert_eq!(Phase::from_altitude(12.5), Phase::Full);
    /// ```
    #[must_use]
    pub fn from_altitude(altitude: f64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|phase| {
                phase
                    .lower_horizon()
                    .is_none_or(|horizon| altitude >= horizon.elevation_angle())
            })
            .unwrap_or(Self::Dark)
    }

    /// Human-readable description of a day spent entirely in this phase.
    #[must_use]
    pub const fn continuous_description(self) -> &'static str {
        match self {
            Self::Dark => "continuous night (polar night): the sun stays below -18° all day",
            Self::Astronomical => "continuous astronomical twilight: no threshold is crossed",
            Self::Nautical => "continuous nautical twilight: no threshold is crossed",
            Self::Civil => "continuous civil twilight: no threshold is crossed",
            Self::Full => "continuous daylight (polar day): the sun stays above the horizon",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A threshold crossing: the instant and the phase the sun enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    /// Instant of the crossing
    pub instant: DateTime<Utc>,
    /// Phase in effect immediately after the crossing
    pub phase: Phase,
}

impl CrossingEvent {
    /// Creates a new crossing event.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>, phase: Phase) -> Self {
        Self { instant, phase }
    }
}

/// Phase-keyed event times, kept in the order the events occurred.
///
/// Serializes as a JSON object whose keys are phase names and values are local timestamps
/// (`YYYY-MM-DDTHH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTimes<Tz: TimeZone> {
    entries: Vec<(Phase, DateTime<Tz>)>,
}

impl<Tz: TimeZone> Default for PhaseTimes<Tz> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Tz: TimeZone> PhaseTimes<Tz> {
    /// Records the time for `phase`, replacing any earlier time recorded under the same key.
    pub fn insert(&mut self, phase: Phase, time: DateTime<Tz>) {
        self.entries.retain(|(p, _)| *p != phase);
        self.entries.push((phase, time));
    }

    /// Time recorded for `phase`.
    #[must_use]
    pub fn get(&self, phase: Phase) -> Option<&DateTime<Tz>> {
        self.entries
            .iter()
            .find_map(|(p, t)| (*p == phase).then_some(t))
    }

    /// Number of recorded phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded phases and times in the order they occurred.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &DateTime<Tz>)> {
        self.entries.iter().map(|(p, t)| (*p, t))
    }
}

/// Local timestamp format used for all reported times.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl<Tz: TimeZone> Serialize for PhaseTimes<Tz>
where
    Tz::Offset: core::fmt::Display,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (phase, time) in &self.entries {
            map.serialize_entry(
                phase.name(),
                &time.format(LOCAL_TIMESTAMP_FORMAT).to_string(),
            )?;
        }
        map.end()
    }
}

/// Sunrise and sunset times for one local day.
///
/// `sunrise` is keyed by the phase entered; `sunset` by the phase being left. "Civil sunrise" is
/// the start of civil-or-brighter, "civil sunset" the end of it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(bound(serialize = "Tz::Offset: core::fmt::Display"))]
pub struct SunTimes<Tz: TimeZone> {
    /// Rising crossings keyed by the phase entered
    pub sunrise: PhaseTimes<Tz>,
    /// Setting crossings keyed by the phase exited
    pub sunset: PhaseTimes<Tz>,
}

impl<Tz: TimeZone> Default for SunTimes<Tz> {
    fn default() -> Self {
        Self {
            sunrise: PhaseTimes::default(),
            sunset: PhaseTimes::default(),
        }
    }
}

/// Outcome of searching one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome<Tz: TimeZone> {
    /// At least one threshold was crossed during the day
    Crossings(SunTimes<Tz>),
    /// No threshold was crossed; the sun stayed in one phase all day
    Continuous(Phase),
}

impl<Tz: TimeZone> DayOutcome<Tz> {
    /// Checks if the sun stayed above the apparent horizon all day.
    pub const fn is_polar_day(&self) -> bool {
        matches!(self, Self::Continuous(Phase::Full))
    }

    /// Checks if the sun stayed below astronomical twilight all day.
    pub const fn is_polar_night(&self) -> bool {
        matches!(self, Self::Continuous(Phase::Dark))
    }

    /// Gets the sunrise/sunset times if any crossing occurred.
    pub const fn times(&self) -> Option<&SunTimes<Tz>> {
        if let Self::Crossings(times) = self {
            Some(times)
        } else {
            None
        }
    }
}
