//! # Candidate Bank
//!
//! Static catalogue of everyone on the ballot.
//!
//! ## Variants
//!
//! - Classic: aurora, orion, lyra
//! - Extended: classic plus nova
//!
//! Seed votes give the results board meaningful percentages before anyone
//! has voted on this device.
//!
//! ## Roster Files
//!
//! A roster can also be read from a JSON file so a kiosk can run a different
//! slate without a rebuild. Same shape as [`Roster`]:
//! ```json
//! { "candidates": [ { "id": "aurora", "name": "Aurora Vale", "tags": ["climate"], "seed_votes": 420 } ] }
//! ```
use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, bail};

pub mod candidates;

use candidates::{Candidate, Roster};

pub fn classic_roster() -> Roster {
    Roster::new(vec![
        Candidate::new("aurora", "Aurora Vale", &["climate", "transit", "open data"], 420),
        Candidate::new("orion", "Orion Reyes", &["housing", "small business"], 360),
        Candidate::new("lyra", "Lyra Chen", &["education", "libraries", "youth"], 220),
    ])
}

pub fn extended_roster() -> Roster {
    let mut roster = classic_roster();
    roster
        .candidates
        .push(Candidate::new("nova", "Nova Okafor", &["health", "parks"], 180));

    roster
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;

    let roster: Roster = serde_json::from_str(&data)
        .with_context(|| format!("Malformed roster {}", path.display()))?;

    validate(&roster)?;

    Ok(roster)
}

pub fn write_roster(path: impl AsRef<Path>, roster: &Roster) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(roster)?;

    fs::write(path, json).with_context(|| format!("Failed to write roster {}", path.display()))
}

pub fn validate(roster: &Roster) -> Result<()> {
    if roster.is_empty() {
        bail!("Roster has no candidates");
    }

    let mut seen = HashSet::new();
    for candidate in roster {
        if candidate.id.trim().is_empty() {
            bail!("Candidate with empty id");
        }

        if !seen.insert(candidate.id.as_str()) {
            bail!("Duplicate candidate id {}", candidate.id);
        }
    }

    Ok(())
}
