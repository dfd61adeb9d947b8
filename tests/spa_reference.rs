//! End-to-end day searches against the SPA ephemeris.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use sun_times::time::LocalDay;
use sun_times::types::LOCAL_TIMESTAMP_FORMAT;
use sun_times::{DayOutcome, Location, Phase, SolarEventFinder, SpaEphemeris, SunTimes};

fn search(lat: f64, lng: f64, date: (i32, u32, u32), zone: Tz) -> DayOutcome<Tz> {
    let ephemeris = SpaEphemeris::new();
    let location = Location::new(lat, lng).unwrap();
    let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
    let day = LocalDay::new(date, &zone).unwrap();
    SolarEventFinder::new(&ephemeris)
        .sun_times(&location, &day)
        .unwrap()
}

fn regular(outcome: &DayOutcome<Tz>) -> &SunTimes<Tz> {
    outcome
        .times()
        .unwrap_or_else(|| panic!("expected crossings, got {outcome:?}"))
}

fn minutes_between<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> i64 {
    (a.with_timezone(&Utc) - b.with_timezone(&Utc)).num_minutes().abs()
}

#[test]
fn equator_equinox_has_twelve_hour_day() {
    let outcome = search(0.0, 0.0, (2024, 3, 20), Tz::UTC);
    let times = regular(&outcome);

    let sunrise = times.sunrise.get(Phase::Full).unwrap();
    let sunset = times.sunset.get(Phase::Full).unwrap();
    let six = Utc.with_ymd_and_hms(2024, 3, 20, 6, 0, 0).unwrap();
    let eighteen = Utc.with_ymd_and_hms(2024, 3, 20, 18, 0, 0).unwrap();

    assert!(minutes_between(sunrise, &six) <= 15, "sunrise {sunrise}");
    assert!(minutes_between(sunset, &eighteen) <= 15, "sunset {sunset}");
}

#[test]
fn mid_latitude_day_has_all_eight_events() {
    let outcome = search(48.21, 16.37, (2024, 3, 20), chrono_tz::Europe::Vienna);
    let times = regular(&outcome);

    let rising: Vec<Phase> = times.sunrise.iter().map(|(p, _)| p).collect();
    let setting: Vec<Phase> = times.sunset.iter().map(|(p, _)| p).collect();
    assert_eq!(
        rising,
        vec![
            Phase::Astronomical,
            Phase::Nautical,
            Phase::Civil,
            Phase::Full
        ]
    );
    assert_eq!(
        setting,
        vec![
            Phase::Full,
            Phase::Civil,
            Phase::Nautical,
            Phase::Astronomical
        ]
    );

    let last_sunrise = times.sunrise.iter().map(|(_, t)| t.clone()).max().unwrap();
    let first_sunset = times.sunset.iter().map(|(_, t)| t.clone()).min().unwrap();
    assert!(last_sunrise < first_sunset);

    let rise_times: Vec<_> = times.sunrise.iter().map(|(_, t)| t.clone()).collect();
    assert!(rise_times.windows(2).all(|w| w[0] < w[1]));
    let set_times: Vec<_> = times.sunset.iter().map(|(_, t)| t.clone()).collect();
    assert!(set_times.windows(2).all(|w| w[0] < w[1]));

    // solar noon near 12:02 CET with a half-day arc of about 6h05m
    let sunrise = times.sunrise.get(Phase::Full).unwrap();
    let expected = chrono_tz::Europe::Vienna
        .with_ymd_and_hms(2024, 3, 20, 5, 57, 0)
        .unwrap();
    assert!(minutes_between(sunrise, &expected) <= 5, "sunrise {sunrise}");
}

#[test]
fn polar_day_and_night_near_june_solstice() {
    let north = search(89.0, 0.0, (2024, 6, 21), Tz::UTC);
    assert_eq!(north, DayOutcome::Continuous(Phase::Full));
    assert!(north.is_polar_day());

    let south = search(-89.0, 0.0, (2024, 6, 21), Tz::UTC);
    assert_eq!(south, DayOutcome::Continuous(Phase::Dark));
    assert!(south.is_polar_night());
}

#[test]
fn white_night_opens_in_civil_twilight() {
    // Helsinki around the solstice: the sun only dips briefly into nautical twilight after
    // local midnight, so the day starts in civil twilight and never reaches astronomical.
    let outcome = search(60.17, 24.94, (2024, 6, 21), chrono_tz::Europe::Helsinki);
    let times = regular(&outcome);

    let rising: Vec<Phase> = times.sunrise.iter().map(|(p, _)| p).collect();
    assert_eq!(rising, vec![Phase::Civil, Phase::Full]);

    assert!(times.sunset.get(Phase::Civil).is_some());
    assert!(times.sunset.get(Phase::Full).is_some());
    assert!(times.sunset.get(Phase::Nautical).is_none());
    assert!(times.sunset.get(Phase::Astronomical).is_none());

    // leaving civil happens shortly after local midnight, before any sunrise
    let dip = times.sunset.get(Phase::Civil).unwrap();
    assert!(dip < times.sunrise.get(Phase::Civil).unwrap());
}

#[test]
fn formatted_times_round_trip_through_zone() {
    let zone = chrono_tz::America::Los_Angeles;
    let outcome = search(34.05, -118.24, (2024, 7, 4), zone);
    let times = regular(&outcome);

    for (_, time) in times.sunrise.iter().chain(times.sunset.iter()) {
        let text = time.format(LOCAL_TIMESTAMP_FORMAT).to_string();
        let parsed = NaiveDateTime::parse_from_str(&text, LOCAL_TIMESTAMP_FORMAT).unwrap();
        let instant = zone.from_local_datetime(&parsed).single().unwrap();
        assert_eq!(instant, time.trunc_subsecs(0), "round trip of {text}");
    }
}

#[test]
fn repeated_searches_are_identical() {
    let first = search(-33.87, 151.21, (2024, 12, 1), chrono_tz::Australia::Sydney);
    let second = search(-33.87, 151.21, (2024, 12, 1), chrono_tz::Australia::Sydney);
    assert_eq!(first, second);
}
