//! Command-line and environment configuration for the server binary.

use crate::ephemeris::SpaEphemeris;
use chrono::Duration;
use clap::Parser;
use std::net::SocketAddr;

/// Runtime configuration. Every option can also be set through a `SUN_TIMES_*` variable.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "sun-times",
    version,
    about = "HTTP service reporting twilight and sunrise/sunset times"
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SUN_TIMES_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Sampling interval of the crossing search, in minutes
    #[arg(
        long,
        env = "SUN_TIMES_SEARCH_STEP_MINUTES",
        default_value_t = 10,
        value_parser = clap::value_parser!(u16).range(1..=120)
    )]
    pub search_step_minutes: u16,

    /// Fixed ΔT (TT - UT1) in seconds; estimated per date when omitted
    #[arg(long, env = "SUN_TIMES_DELTA_T", allow_negative_numbers = true)]
    pub delta_t: Option<f64>,

    /// Observer elevation above sea level in metres
    #[arg(
        long,
        env = "SUN_TIMES_ELEVATION",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub elevation: f64,

    /// Log filter directive, e.g. `info` or `sun_times=debug,tower_http=debug`
    #[arg(long, env = "SUN_TIMES_LOG", default_value = "info")]
    pub log: String,
}

impl Config {
    /// Builds the ephemeris described by this configuration.
    #[must_use]
    pub fn ephemeris(&self) -> SpaEphemeris {
        let ephemeris = SpaEphemeris::new()
            .with_elevation(self.elevation)
            .with_search_step(Duration::minutes(i64::from(self.search_step_minutes)));
        match self.delta_t {
            Some(delta_t) => ephemeris.with_delta_t(delta_t),
            None => ephemeris,
        }
    }
}
