use std::{collections::HashMap, fmt, str::FromStr};

use bank::candidates::Roster;
use serde::Serialize;

use crate::error::BallotError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AuthFlags {
    pub fingerprint: bool,
    pub face: bool,
}

impl AuthFlags {
    pub fn is_verified(&self) -> bool {
        self.fingerprint || self.face
    }
}

/// Per-candidate vote counts. Counts only go up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl Tally {
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            order: roster.ids().map(str::to_string).collect(),
            counts: roster
                .iter()
                .map(|candidate| (candidate.id.clone(), candidate.seed_votes))
                .collect(),
        }
    }

    pub fn increment(&mut self, id: &str) -> Result<u64, BallotError> {
        let count = self
            .counts
            .get_mut(id)
            .ok_or_else(|| BallotError::UnknownCandidate(id.to_string()))?;

        *count = count.saturating_add(1);

        Ok(*count)
    }

    pub fn count(&self, id: &str) -> Option<u64> {
        self.counts.get(id).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Counts in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.counts.get(id).copied().unwrap_or(0)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserBallot {
    has_voted: bool,
    pub selected: Option<String>,
}

impl UserBallot {
    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    /// One way only.
    pub fn lock(&mut self) {
        self.has_voted = true;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub auth: AuthFlags,
    pub tally: Tally,
    pub user: UserBallot,
}

impl SessionState {
    pub fn new(roster: &Roster) -> Self {
        Self {
            auth: AuthFlags::default(),
            tally: Tally::from_roster(roster),
            user: UserBallot::default(),
        }
    }

    pub fn can_vote(&self) -> bool {
        self.auth.is_verified() && !self.user.has_voted()
    }
}
