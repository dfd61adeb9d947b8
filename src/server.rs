//! HTTP interface.
//!
//! `GET /astronomy/sun` resolves the request parameters, searches the local day and returns
//! the sunrise/sunset times as JSON. Input problems are answered with `400`, failures of the
//! computation itself with `500`; both carry `{"error": "<message>"}`.

use crate::ephemeris::Ephemeris;
use crate::finder::SolarEventFinder;
use crate::time::{LocalDay, parse_day, today_in};
use crate::timezone::{ZoneLookup, resolve_zone};
use crate::types::{DayOutcome, Location, Phase, PhaseTimes};
use crate::{Error, Result};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use chrono_tz::Tz;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only resources of the service.
#[derive(Clone)]
pub struct AppState {
    ephemeris: Arc<dyn Ephemeris>,
    zones: Arc<dyn ZoneLookup>,
}

impl AppState {
    /// Bundles the ephemeris and the coordinate zone lookup.
    pub fn new(ephemeris: Arc<dyn Ephemeris>, zones: Arc<dyn ZoneLookup>) -> Self {
        Self { ephemeris, zones }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/astronomy/sun", get(sun))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> &'static str {
    concat!("sun-times ", env!("CARGO_PKG_VERSION"))
}

/// Validated `GET /astronomy/sun` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SunQuery {
    /// Observer location
    pub location: Location,
    /// Explicit IANA zone name, if any
    pub timezone: Option<String>,
    /// Raw day parameter, if any
    pub day: Option<String>,
}

impl SunQuery {
    /// Reads the query parameters, accepting `lat`/`latitude`, `lng`/`longitude` and
    /// `day`/`date`. Empty values count as absent.
    ///
    /// # Errors
    /// Returns `MissingParameter`, `InvalidNumber`, `InvalidLatitude` or `InvalidLongitude`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let latitude = number(params, "lat", "latitude")?;
        let longitude = number(params, "lng", "longitude")?;
        Ok(Self {
            location: Location::new(latitude, longitude)?,
            timezone: text(params, "timezone", "tz").map(str::to_owned),
            day: text(params, "day", "date").map(str::to_owned),
        })
    }
}

fn text<'a>(params: &'a HashMap<String, String>, name: &str, alias: &str) -> Option<&'a str> {
    [name, alias]
        .into_iter()
        .filter_map(|key| params.get(key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

fn number(params: &HashMap<String, String>, name: &'static str, alias: &str) -> Result<f64> {
    let raw = text(params, name, alias).ok_or(Error::missing_parameter(name))?;
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::invalid_number(name, raw))
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunResponse {
    /// IANA name of the zone used for windowing and formatting
    pub timezone: &'static str,
    /// Sunrise times keyed by the phase entered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<PhaseTimes<Tz>>,
    /// Sunset times keyed by the phase exited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<PhaseTimes<Tz>>,
    /// Phase held all day when no threshold is crossed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    /// Description of a day without crossings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl SunResponse {
    fn new(zone: Tz, outcome: DayOutcome<Tz>) -> Self {
        let timezone = zone.name();
        match outcome {
            DayOutcome::Crossings(times) => Self {
                timezone,
                sunrise: Some(times.sunrise),
                sunset: Some(times.sunset),
                phase: None,
                message: None,
            },
            DayOutcome::Continuous(phase) => Self {
                timezone,
                sunrise: None,
                sunset: None,
                phase: Some(phase),
                message: Some(phase.continuous_description()),
            },
        }
    }
}

/// Computes the response for validated parameters.
///
/// # Errors
/// Returns zone resolution, day parsing and windowing errors, and any ephemeris failure.
pub fn compute(
    query: &SunQuery,
    ephemeris: &dyn Ephemeris,
    zones: &dyn ZoneLookup,
) -> Result<SunResponse> {
    let zone = resolve_zone(query.timezone.as_deref(), &query.location, zones)?;
    let date = match &query.day {
        Some(day) => parse_day(day, &zone)?,
        None => today_in(&zone),
    };
    let day = LocalDay::new(date, &zone)?;

    let outcome = SolarEventFinder::new(ephemeris).sun_times(&query.location, &day)?;
    tracing::debug!(
        timezone = zone.name(),
        %date,
        crossings = outcome
            .times()
            .map_or(0, |times| times.sunrise.len() + times.sunset.len()),
        polar_day = outcome.is_polar_day(),
        polar_night = outcome.is_polar_night(),
        "computed sun times"
    );
    Ok(SunResponse::new(zone, outcome))
}

async fn sun(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> core::result::Result<Json<SunResponse>, ApiError> {
    let query = SunQuery::from_params(&params)?;
    let response = compute(&query, state.ephemeris.as_ref(), state.zones.as_ref())?;
    Ok(Json(response))
}

/// Error response wrapper mapping [`Error`] to a status code and JSON body.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            tracing::debug!(error = %self.0, "rejected request");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "computation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error_response(status, self.0.to_string())
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unexpected failure");
    tracing::error!(panic = message, "request handler panicked");
    let mut response = error_response(StatusCode::INTERNAL_SERVER_ERROR, message.to_owned());
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_parameter_aliases() {
        let query = SunQuery::from_params(&params(&[
            ("latitude", "48.21"),
            ("longitude", "16.37"),
            ("date", "2024-03-20"),
        ]))
        .unwrap();
        assert_eq!(query.location, Location::new(48.21, 16.37).unwrap());
        assert_eq!(query.day.as_deref(), Some("2024-03-20"));
        assert_eq!(query.timezone, None);
    }

    #[test]
    fn test_missing_and_invalid_parameters() {
        assert_eq!(
            SunQuery::from_params(&params(&[("lng", "0")])),
            Err(Error::missing_parameter("lat"))
        );
        assert_eq!(
            SunQuery::from_params(&params(&[("lat", ""), ("lng", "0")])),
            Err(Error::missing_parameter("lat"))
        );
        assert_eq!(
            SunQuery::from_params(&params(&[("lat", "north"), ("lng", "0")])),
            Err(Error::invalid_number("lat", "north"))
        );
        assert_eq!(
            SunQuery::from_params(&params(&[("lat", "10"), ("lng", "inf")])),
            Err(Error::invalid_number("lng", "inf"))
        );
        assert_eq!(
            SunQuery::from_params(&params(&[("lat", "91"), ("lng", "0")])),
            Err(Error::invalid_latitude(91.0))
        );
        assert_eq!(
            SunQuery::from_params(&params(&[("lat", "0"), ("lng", "200")])),
            Err(Error::invalid_longitude(200.0))
        );
    }

    #[test]
    fn test_api_error_status() {
        let response = ApiError::from(Error::invalid_latitude(91.0)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(Error::computation("no convergence")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_response_uses_message() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }
}
