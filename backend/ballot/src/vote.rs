//! # Ballot State Machine
//!
//! `Idle -> Ready -> Selected -> Locked`
//!
//! - `Idle`: no biometric channel verified, vote clicks are rejected
//! - `Ready`: verified, no confirmation pending
//! - `Selected`: a candidate is awaiting confirmation
//! - `Locked`: vote recorded, terminal for the session
//!
//! Only a confirm moves a count. Cancel and backdrop clicks just drop the
//! pending candidate.
use serde::Serialize;
use tracing::info;

use crate::{
    activity::ActivityTag, controller::Controller, error::BallotError, render::RenderSink,
    storage::KeyValueStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BallotPhase {
    Idle,
    Ready,
    Selected,
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotVerified,
    AlreadyVoted,
    NothingPending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    AwaitingConfirmation(String),
    Cast { candidate: String, count: u64 },
    Rejected(Rejection),
}

impl<S: KeyValueStore, R: RenderSink> Controller<S, R> {
    pub fn phase(&self) -> BallotPhase {
        if self.state.user.has_voted() {
            BallotPhase::Locked
        } else if !self.state.auth.is_verified() {
            BallotPhase::Idle
        } else if self.pending.is_some() {
            BallotPhase::Selected
        } else {
            BallotPhase::Ready
        }
    }

    /// Vote button on a candidate card.
    pub fn click_vote(&mut self, id: &str) -> Result<VoteOutcome, BallotError> {
        if !self.config.roster.contains(id) {
            return Err(BallotError::UnknownCandidate(id.to_string()));
        }

        if !self.state.auth.is_verified() {
            self.vote_status = "Need biometric unlock first".to_string();
            self.activity.push(ActivityTag::Deny, "Vote blocked - no biometrics");
            self.render();

            return Ok(VoteOutcome::Rejected(Rejection::NotVerified));
        }

        if self.state.user.has_voted() {
            self.vote_status = "Vote already locked".to_string();
            self.render();

            return Ok(VoteOutcome::Rejected(Rejection::AlreadyVoted));
        }

        self.state.user.selected = Some(id.to_string());
        self.pending = Some(id.to_string());

        self.refresh_vote_status();
        self.persist();
        self.render();

        Ok(VoteOutcome::AwaitingConfirmation(id.to_string()))
    }

    pub fn confirm(&mut self) -> Result<VoteOutcome, BallotError> {
        let Some(id) = self.pending.take() else {
            self.render();
            return Ok(VoteOutcome::Rejected(Rejection::NothingPending));
        };

        if self.state.user.has_voted() {
            self.render();
            return Ok(VoteOutcome::Rejected(Rejection::AlreadyVoted));
        }

        if !self.state.auth.is_verified() {
            self.render();
            return Ok(VoteOutcome::Rejected(Rejection::NotVerified));
        }

        let count = self.state.tally.increment(&id)?;
        self.state.user.lock();
        info!(candidate = %id, count, "Vote cast");

        self.activity.push(ActivityTag::Cast, format!("Vote stored for {id}"));
        self.vote_status = format!("Ballot locked · {id}");

        self.persist();
        self.render();

        Ok(VoteOutcome::Cast {
            candidate: id,
            count,
        })
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.vote_status = "Secure channel ready".to_string();
        }

        self.render();
    }

    /// Click on the modal backdrop.
    pub fn dismiss(&mut self) {
        self.pending = None;
        self.render();
    }

    pub(crate) fn refresh_vote_status(&mut self) {
        let selected = self.state.user.selected.as_deref();

        self.vote_status = if self.state.user.has_voted() {
            format!("Ballot locked · {}", selected.unwrap_or_default())
        } else if !self.state.auth.is_verified() {
            "Secure channel idle".to_string()
        } else if let Some(id) = selected {
            format!("Ready to confirm · {id}")
        } else {
            "Secure channel ready".to_string()
        };
    }
}
