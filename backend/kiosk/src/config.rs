use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use ballot::{BallotConfig, Variant};
use bank::load_roster;
use tracing::{debug, info};

use crate::{error::KioskError, terminal::Output};

#[derive(Clone, Debug)]
pub struct Config {
    pub variant: Variant,
    pub store_path: PathBuf,
    pub roster_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub tick: Duration,
    pub output: Output,
}

impl Config {
    pub fn load() -> Result<Self, KioskError> {
        Ok(Self {
            variant: try_load("NOVA_VARIANT", "classic")?,
            store_path: try_load("NOVA_STORE", "nova-store.json")?,
            roster_path: try_load_optional("NOVA_ROSTER")?,
            seed: try_load_optional("NOVA_SEED")?,
            tick: Duration::from_millis(try_load("NOVA_TICK_MS", "50")?),
            output: try_load("NOVA_OUTPUT", "text")?,
        })
    }

    /// Variant preset, with the roster swapped out when a roster file is set.
    pub fn ballot_config(&self) -> Result<BallotConfig, KioskError> {
        let config = BallotConfig::for_variant(self.variant);

        match &self.roster_path {
            Some(path) => {
                let roster = load_roster(path).map_err(|e| KioskError::Roster(format!("{e:#}")))?;
                info!("Loaded {} candidates from {}", roster.len(), path.display());

                Ok(config.with_roster(roster))
            }
            None => Ok(config),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, KioskError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn try_load_optional<T: FromStr>(key: &str) -> Result<Option<T>, KioskError>
where
    T::Err: Display,
{
    match var(key) {
        Some(raw) => parse(key, &raw).map(Some),
        None => {
            debug!("{key} not set");
            Ok(None)
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, KioskError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| KioskError::Config {
        key: key.to_string(),
        message: e.to_string(),
    })
}
