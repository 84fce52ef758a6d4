use std::{fmt, str::FromStr, time::Duration};

use bank::{candidates::Roster, classic_roster, extended_roster};

/// Which build of the kiosk to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Classic,
    Extended,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "extended" => Ok(Variant::Extended),
            other => Err(format!("unknown variant {other:?}, expected classic or extended")),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Classic => f.write_str("classic"),
            Variant::Extended => f.write_str("extended"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BallotConfig {
    pub roster: Roster,
    /// Chance per telemetry tick of a synthetic live vote.
    pub noise_probability: f64,
    /// Cosmetic denominator for the turnout meter.
    pub turnout_cap: u64,
    pub activity_cap: usize,
    pub latency_floor_ms: f64,
    pub latency_spread_ms: f64,
    pub telemetry_interval: Duration,
    pub fingerprint_delay: Duration,
    pub face_camera_delay: Duration,
    pub face_fallback_delay: Duration,
    pub search_debounce: Duration,
}

impl BallotConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                roster: classic_roster(),
                noise_probability: 0.45,
                turnout_cap: 14,
                activity_cap: 9,
                ..Self::base()
            },
            Variant::Extended => Self {
                roster: extended_roster(),
                noise_probability: 0.40,
                turnout_cap: 18,
                activity_cap: 10,
                ..Self::base()
            },
        }
    }

    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Latency ceiling used to scale the latency bar.
    pub fn latency_ceiling_ms(&self) -> f64 {
        self.latency_floor_ms + self.latency_spread_ms
    }

    fn base() -> Self {
        Self {
            roster: Roster::default(),
            noise_probability: 0.45,
            turnout_cap: 14,
            activity_cap: 9,
            latency_floor_ms: 6.0,
            latency_spread_ms: 12.0,
            telemetry_interval: Duration::from_millis(2400),
            fingerprint_delay: Duration::from_millis(1300),
            face_camera_delay: Duration::from_millis(2200),
            face_fallback_delay: Duration::from_millis(1500),
            search_debounce: Duration::from_millis(180),
        }
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
