//! # Sun Times
//!
//! Twilight and sunrise/sunset times for a location and local calendar day, served over HTTP.
//!
//! For one calendar day in one time zone, the service finds every instant at which the sun's
//! altitude crosses one of the standard thresholds and reports each crossing as a sunrise or a
//! sunset event:
//!
//! | Phase          | Solar altitude        |
//! |----------------|-----------------------|
//! | `dark`         | below −18°            |
//! | `astronomical` | −18° to −12°          |
//! | `nautical`     | −12° to −6°           |
//! | `civil`        | −6° to −0.833°        |
//! | `full`         | above −0.833° (day)   |
//!
//! Sunrise events are keyed by the phase the sun enters, sunset events by the phase it leaves.
//! Days on which no threshold is crossed (polar day, polar night, continuous twilight) are
//! reported as such instead of as empty results.
//!
//! Solar altitudes come from the NREL Solar Position Algorithm via the `solar-positioning`
//! crate; the [`Ephemeris`] trait allows any other model to be plugged in.
//!
//! ## Quick Start
//!
//! ```rust
//! use sun_times::{Location, Phase, SolarEventFinder, SpaEphemeris, time::LocalDay};
//! use chrono::NaiveDate;
//!
//! let ephemeris = SpaEphemeris::new();
//! let vienna = Location::new(48.21, 16.37).unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let day = LocalDay::new(date, &chrono_tz::Europe::Vienna).unwrap();
//!
//! let outcome = SolarEventFinder::new(&ephemeris).sun_times(&vienna, &day).unwrap();
//! let times = outcome.times().expect("regular day");
//! println!("Sunrise: {}", times.sunrise.get(Phase::Full).unwrap());
//! println!("Sunset:  {}", times.sunset.get(Phase::Full).unwrap());
//! ```
//!
//! ## HTTP API
//!
//! `GET /astronomy/sun?lat=48.21&lng=16.37&day=20240320` returns
//!
//! ```json
//! {
//!   "timezone": "Europe/Vienna",
//!   "sunrise": { "astronomical": "YYYY-MM-DDTHH:MM:SS", "nautical": "...", "civil": "...", "full": "..." },
//!   "sunset": { "full": "...", "civil": "...", "nautical": "...", "astronomical": "..." }
//! }
//! ```
//!
//! Optional parameters are `timezone` (IANA name, inferred from the coordinates otherwise) and
//! `day` (`YYYYMMDD`, `YYYY-MM-DD` or an ISO timestamp; today when omitted).

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp, // Exact comparisons of configured values in tests
)]

// Public API exports
pub use crate::ephemeris::{Ephemeris, SpaEphemeris};
pub use crate::error::{Error, Result};
pub use crate::finder::{SolarEventFinder, classify};
pub use crate::types::{CrossingEvent, DayOutcome, Location, Phase, PhaseTimes, SunTimes};

// Core modules
pub mod error;
pub mod types;

// Computation
pub mod ephemeris;
pub mod finder;
pub mod search;

// Time and zones
pub mod time;
pub mod timezone;

// Service
pub mod config;
pub mod server;
