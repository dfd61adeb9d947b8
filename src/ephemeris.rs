//! Solar altitude oracle.
//!
//! [`Ephemeris`] is the seam between the phase classification logic and the solar position
//! model. The production implementation, [`SpaEphemeris`], evaluates the NREL SPA algorithm; tests
//! substitute scripted implementations.

use crate::search::{DEFAULT_EPSILON, find_discrete};
use crate::types::{CrossingEvent, Location, Phase};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use solar_positioning::spa;
use solar_positioning::time::DeltaT;

/// Default interval between altitude samples when searching for crossings.
pub const DEFAULT_SEARCH_STEP: Duration = Duration::minutes(10);

/// Source of solar altitudes and threshold crossings for a location.
///
/// Implementations must be immutable after construction; one instance is shared by all request
/// handlers.
pub trait Ephemeris: Send + Sync {
    /// Geometric (unrefracted) altitude of the sun's centre in degrees at `instant`.
    ///
    /// # Errors
    /// Returns an error if the model cannot evaluate this instant.
    fn altitude(&self, location: &Location, instant: DateTime<Utc>) -> Result<f64>;

    /// Phase in effect at `instant`.
    ///
    /// # Errors
    /// Propagates errors from [`Ephemeris::altitude`].
    fn phase_at(&self, location: &Location, instant: DateTime<Utc>) -> Result<Phase> {
        let altitude = self.altitude(location, instant)?;
        if !altitude.is_finite() {
            return Err(Error::computation("solar altitude is not finite"));
        }
        Ok(Phase::from_altitude(altitude))
    }

    /// Every threshold crossing in `[start, end)`, in chronological order.
    ///
    /// Each event carries the phase entered at that instant, which always differs from the
    /// phase of the preceding event.
    ///
    /// # Errors
    /// Propagates errors from [`Ephemeris::phase_at`].
    fn crossings(
        &self,
        location: &Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CrossingEvent>> {
        let events = find_discrete(start, end, self.search_step(), DEFAULT_EPSILON, |t| {
            self.phase_at(location, t)
        })?;
        Ok(events
            .into_iter()
            .filter(|(instant, _)| *instant < end)
            .map(|(instant, phase)| CrossingEvent::new(instant, phase))
            .collect())
    }

    /// Sampling interval used by the default [`Ephemeris::crossings`].
    fn search_step(&self) -> Duration {
        DEFAULT_SEARCH_STEP
    }
}

/// Solar altitudes from the NREL Solar Position Algorithm.
///
/// ΔT is estimated per instant with the Espenak & Meeus polynomials unless a fixed value is
/// configured.
///
/// # Example
/// ```
/// # use sun_times::{Ephemeris, Location, SpaEphemeris};
/// use chrono::{TimeZone, Utc};
///
/// let ephemeris = SpaEphemeris::new().with_delta_t(69.0);
/// let quito = Location::new(-0.18, -78.47).unwrap();
/// let noon = Utc.with_ymd_and_hms(2024, 3, 20, 17, 0, 0).unwrap();
/// assert!(ephemeris.altitude(&quito, noon).unwrap() > 80.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpaEphemeris {
    elevation: f64,
    delta_t: Option<f64>,
    search_step: Duration,
}

impl Default for SpaEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaEphemeris {
    /// Creates an ephemeris for a sea-level observer with estimated ΔT.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elevation: 0.0,
            delta_t: None,
            search_step: DEFAULT_SEARCH_STEP,
        }
    }

    /// Uses a fixed ΔT (seconds) instead of estimating it per instant.
    #[must_use]
    pub const fn with_delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = Some(delta_t);
        self
    }

    /// Sets the observer elevation in metres above sea level.
    #[must_use]
    pub const fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    /// Sets the sampling interval of the crossing search.
    #[must_use]
    pub const fn with_search_step(mut self, step: Duration) -> Self {
        self.search_step = step;
        self
    }

    /// Observer elevation in metres.
    #[must_use]
    pub const fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Fixed ΔT in seconds, if configured.
    #[must_use]
    pub const fn delta_t(&self) -> Option<f64> {
        self.delta_t
    }
}

impl Ephemeris for SpaEphemeris {
    fn altitude(&self, location: &Location, instant: DateTime<Utc>) -> Result<f64> {
        let delta_t = match self.delta_t {
            Some(delta_t) => delta_t,
            None => DeltaT::estimate_from_date_like(instant)?,
        };
        let position = spa::solar_position(
            instant,
            location.latitude(),
            location.longitude(),
            self.elevation,
            delta_t,
            None,
        )?;
        Ok(position.elevation_angle())
    }

    fn search_step(&self) -> Duration {
        self.search_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_altitude_day_and_night() {
        let ephemeris = SpaEphemeris::new();
        let vienna = Location::new(48.21, 16.37).unwrap();

        let noon = Utc.with_ymd_and_hms(2024, 6, 21, 11, 0, 0).unwrap();
        let altitude = ephemeris.altitude(&vienna, noon).unwrap();
        // 90 - 48.21 + 23.44
        assert!((altitude - 65.2).abs() < 0.5, "noon altitude {altitude}");

        let midnight = Utc.with_ymd_and_hms(2024, 12, 21, 23, 0, 0).unwrap();
        assert_eq!(ephemeris.phase_at(&vienna, midnight).unwrap(), Phase::Dark);
    }

    #[test]
    fn test_fixed_delta_t_is_used() {
        let estimated = SpaEphemeris::new();
        let fixed = SpaEphemeris::new().with_delta_t(69.0);
        let location = Location::new(37.7749, -122.4194).unwrap();
        let instant = Utc.with_ymd_and_hms(2023, 6, 21, 19, 0, 0).unwrap();

        let a = estimated.altitude(&location, instant).unwrap();
        let b = fixed.altitude(&location, instant).unwrap();
        assert!((a - b).abs() < 0.01);
        assert_eq!(fixed.delta_t(), Some(69.0));
    }

    #[test]
    fn test_delta_t_range_error_surfaces() {
        let ephemeris = SpaEphemeris::new();
        let location = Location::new(0.0, 0.0).unwrap();
        let far_future = Utc.with_ymd_and_hms(4000, 1, 1, 0, 0, 0).unwrap();

        let err = ephemeris.altitude(&location, far_future).unwrap_err();
        assert!(matches!(err, Error::Ephemeris(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_crossings_mid_latitude_equinox() {
        let ephemeris = SpaEphemeris::new();
        let vienna = Location::new(48.21, 16.37).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 19, 23, 0, 0).unwrap();
        let end = start + Duration::days(1);

        let events = ephemeris.crossings(&vienna, start, end).unwrap();
        let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Astronomical,
                Phase::Nautical,
                Phase::Civil,
                Phase::Full,
                Phase::Civil,
                Phase::Nautical,
                Phase::Astronomical,
                Phase::Dark,
            ]
        );
        assert!(events.windows(2).all(|w| w[0].instant < w[1].instant));
        assert!(events.iter().all(|e| e.instant >= start && e.instant < end));
    }

    #[test]
    fn test_coarser_step_finds_same_sunrise() {
        let location = Location::new(40.7128, -74.0060).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 4, 0, 0).unwrap();
        let end = start + Duration::days(1);

        let fine = SpaEphemeris::new().with_search_step(Duration::minutes(2));
        let coarse = SpaEphemeris::new().with_search_step(Duration::minutes(30));
        let a = fine.crossings(&location, start, end).unwrap();
        let b = coarse.crossings(&location, start, end).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.phase, y.phase);
            assert!((x.instant - y.instant).num_milliseconds().abs() <= 2);
        }
    }
}
