//! Error types for the sun times service.

use chrono::NaiveDate;

/// Result type alias for operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while resolving a request or computing its solar events.
///
/// Every variant except [`Error::Ephemeris`] and [`Error::Computation`] describes bad input and
/// is reported to the caller as a client error; see [`Error::is_client_error`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required query parameter was not supplied.
    #[error("{name} parameter is required")]
    MissingParameter {
        /// Canonical name of the missing parameter.
        name: &'static str,
    },
    /// A numeric query parameter could not be parsed.
    #[error("{name} must be a number (got {value:?})")]
    InvalidNumber {
        /// Canonical name of the parameter.
        name: &'static str,
        /// The raw value supplied.
        value: String,
    },
    /// Invalid latitude value (must be between -90 and +90 degrees).
    #[error("lat must be between -90 and 90 (got {value})")]
    InvalidLatitude {
        /// The invalid latitude value provided.
        value: f64,
    },
    /// Invalid longitude value (must be between -180 and +180 degrees).
    #[error("lng must be between -180 and 180 (got {value})")]
    InvalidLongitude {
        /// The invalid longitude value provided.
        value: f64,
    },
    /// The requested time zone name is not in the IANA database.
    #[error("unknown timezone: {name}")]
    UnknownTimezone {
        /// The zone name as supplied.
        name: String,
    },
    /// No time zone is defined at the given coordinates (e.g. open ocean).
    #[error("could not determine timezone for location ({latitude}, {longitude})")]
    UnresolvedTimezone {
        /// Latitude of the lookup.
        latitude: f64,
        /// Longitude of the lookup.
        longitude: f64,
    },
    /// The `day` parameter is not in a recognized format.
    #[error("day must be in YYYYMMDD format (got {value:?})")]
    MalformedDay {
        /// The raw value supplied.
        value: String,
    },
    /// The `day` parameter is well-formed but names no calendar date.
    #[error("invalid day: {value} is not a valid calendar date")]
    InvalidCalendarDate {
        /// The raw value supplied.
        value: String,
    },
    /// Local midnight occurs twice on this date in this zone.
    #[error("invalid day: local midnight on {date} is ambiguous in this time zone")]
    AmbiguousLocalMidnight {
        /// Calendar date of the window boundary.
        date: NaiveDate,
    },
    /// Local midnight is skipped on this date in this zone.
    #[error("invalid day: local midnight on {date} does not exist in this time zone")]
    NonexistentLocalMidnight {
        /// Calendar date of the window boundary.
        date: NaiveDate,
    },
    /// The solar position model rejected a calculation.
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] solar_positioning::Error),
    /// Numerical or formatting failure inside the computation.
    #[error("computation error: {message}")]
    Computation {
        /// Description of the failure.
        message: String,
    },
}

impl Error {
    /// Creates a missing parameter error.
    #[must_use]
    pub const fn missing_parameter(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    /// Creates an invalid number error.
    #[must_use]
    pub fn invalid_number(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            name,
            value: value.into(),
        }
    }

    /// Creates an invalid latitude error.
    #[must_use]
    pub const fn invalid_latitude(value: f64) -> Self {
        Self::InvalidLatitude { value }
    }

    /// Creates an invalid longitude error.
    #[must_use]
    pub const fn invalid_longitude(value: f64) -> Self {
        Self::InvalidLongitude { value }
    }

    /// Creates an unknown timezone error.
    #[must_use]
    pub fn unknown_timezone(name: impl Into<String>) -> Self {
        Self::UnknownTimezone { name: name.into() }
    }

    /// Creates a computation error.
    #[must_use]
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the request rather than by the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Ephemeris(_) | Self::Computation { .. })
    }
}

/// Validates latitude is within the valid range (-90 to +90 degrees).
///
/// # Errors
/// Returns `InvalidLatitude` if latitude is outside -90 to +90 degrees or not finite.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid_latitude(latitude));
    }
    Ok(())
}

/// Validates longitude is within the valid range (-180 to +180 degrees).
///
/// # Errors
/// Returns `InvalidLongitude` if longitude is outside -180 to +180 degrees or not finite.
pub fn check_longitude(longitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid_longitude(longitude));
    }
    Ok(())
}

/// Validates both latitude and longitude are within valid ranges.
///
/// # Errors
/// Returns `InvalidLatitude` or `InvalidLongitude` for out-of-range coordinates.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_latitude(latitude)?;
    check_longitude(longitude)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_validation() {
        assert!(check_latitude(0.0).is_ok());
        assert!(check_latitude(90.0).is_ok());
        assert!(check_latitude(-90.0).is_ok());

        assert!(check_latitude(91.0).is_err());
        assert!(check_latitude(-90.5).is_err());
        assert!(check_latitude(f64::NAN).is_err());
        assert!(check_latitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_longitude_validation() {
        assert!(check_longitude(180.0).is_ok());
        assert!(check_longitude(-180.0).is_ok());
        assert!(check_longitude(-73.98).is_ok());

        assert!(check_longitude(200.0).is_err());
        assert!(check_longitude(-180.01).is_err());
        assert!(check_longitude(f64::NAN).is_err());
    }

    #[test]
    fn test_coordinates_report_latitude_first() {
        assert_eq!(
            check_coordinates(95.0, 500.0),
            Err(Error::invalid_latitude(95.0))
        );
        assert_eq!(
            check_coordinates(45.0, 500.0),
            Err(Error::invalid_longitude(500.0))
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::invalid_latitude(91.0).to_string(),
            "lat must be between -90 and 90 (got 91)"
        );
        assert_eq!(
            Error::invalid_longitude(200.0).to_string(),
            "lng must be between -180 and 180 (got 200)"
        );
        assert_eq!(
            Error::missing_parameter("lat").to_string(),
            "lat parameter is required"
        );
        assert_eq!(
            Error::unknown_timezone("Not/AZone").to_string(),
            "unknown timezone: Not/AZone"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::invalid_latitude(91.0).is_client_error());
        assert!(Error::unknown_timezone("Mars/Olympus").is_client_error());
        assert!(
            Error::UnresolvedTimezone {
                latitude: 0.0,
                longitude: -30.0
            }
            .is_client_error()
        );
        assert!(!Error::computation("bracket did not converge").is_client_error());
        assert!(
            !Error::from(solar_positioning::Error::invalid_datetime("year out of range"))
                .is_client_error()
        );
    }
}
