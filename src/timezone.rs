//! Time zone resolution from explicit IANA names or from coordinates.

use crate::types::Location;
use crate::{Error, Result};
use chrono_tz::Tz;

/// Maps coordinates to an IANA time zone name.
///
/// Implementations are built once at startup and shared by all request handlers.
pub trait ZoneLookup: Send + Sync {
    /// Zone name covering `location`, or `None` if no zone is defined there.
    fn zone_name(&self, location: &Location) -> Option<String>;
}

/// Coordinate lookup backed by the `tzf-rs` boundary data set.
pub struct TzfLookup {
    finder: tzf_rs::DefaultFinder,
}

impl core::fmt::Debug for TzfLookup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TzfLookup").finish_non_exhaustive()
    }
}

impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TzfLookup {
    /// Loads the boundary data. This takes a noticeable moment; do it once.
    #[must_use]
    pub fn new() -> Self {
        Self {
            finder: tzf_rs::DefaultFinder::new(),
        }
    }
}

impl ZoneLookup for TzfLookup {
    fn zone_name(&self, location: &Location) -> Option<String> {
        // tzf-rs takes (longitude, latitude)
        let name = self
            .finder
            .get_tz_name(location.longitude(), location.latitude());
        (!name.is_empty()).then(|| name.to_owned())
    }
}

/// Parses an IANA zone name such as `Europe/Vienna`.
///
/// # Errors
/// Returns `UnknownTimezone` if the name is not in the time zone database.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::unknown_timezone(name))
}

/// Resolves the zone for a request: the explicit name if given, else the zone at `location`.
///
/// # Errors
/// Returns `UnknownTimezone` for an unrecognized explicit name, `UnresolvedTimezone` if the
/// lookup finds no zone at `location`, and `Computation` if the lookup yields a name unknown to
/// the time zone database.
pub fn resolve_zone(
    requested: Option<&str>,
    location: &Location,
    lookup: &dyn ZoneLookup,
) -> Result<Tz> {
    if let Some(name) = requested {
        return parse_zone(name);
    }

    let name = lookup
        .zone_name(location)
        .ok_or(Error::UnresolvedTimezone {
            latitude: location.latitude(),
            longitude: location.longitude(),
        })?;
    name.parse::<Tz>().map_err(|_| {
        Error::computation(format!(
            "zone {name} found for location is not in the time zone database"
        ))
    })
}
