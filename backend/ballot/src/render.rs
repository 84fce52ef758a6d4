//! # Rendering
//!
//! The controller never touches a display directly. After every state change
//! it builds a [`View`] snapshot and hands it to a [`RenderSink`].
//!
//! ## Element Contract
//! A sink declares which [`Element`]s it can show. Required elements must be
//! present at startup; the turnout meter, latency meter and secured-vote
//! label are optional. Card views carry the `data-id`, `data-name` and
//! `data-tags` values a markup surface keys its cards on.
use serde::Serialize;

use crate::{
    activity::ActivityEntry, auth::ScanStatus, results::ResultsView, state::Theme,
    telemetry::LatencySample, vote::BallotPhase,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Element {
    ThemeToggle,
    FingerprintButton,
    FingerprintStatus,
    FaceButton,
    FaceStatus,
    AuthChip,
    CameraPreview,
    SearchInput,
    SearchEmpty,
    CandidateGrid,
    VoteStatus,
    ResultsBars,
    ActivityFeed,
    ConfirmModal,
    ConfirmButton,
    CancelButton,
    TurnoutMeter,
    LatencyMeter,
    VotesSecured,
}

impl Element {
    pub const ALL: [Element; 19] = [
        Element::ThemeToggle,
        Element::FingerprintButton,
        Element::FingerprintStatus,
        Element::FaceButton,
        Element::FaceStatus,
        Element::AuthChip,
        Element::CameraPreview,
        Element::SearchInput,
        Element::SearchEmpty,
        Element::CandidateGrid,
        Element::VoteStatus,
        Element::ResultsBars,
        Element::ActivityFeed,
        Element::ConfirmModal,
        Element::ConfirmButton,
        Element::CancelButton,
        Element::TurnoutMeter,
        Element::LatencyMeter,
        Element::VotesSecured,
    ];

    pub fn is_required(&self) -> bool {
        !matches!(
            self,
            Element::TurnoutMeter | Element::LatencyMeter | Element::VotesSecured
        )
    }
}

pub trait RenderSink {
    fn provides(&self, _element: Element) -> bool {
        true
    }

    fn render(&mut self, view: &View);

    /// Draws the view even when nothing changed since the last frame.
    fn redraw(&mut self, view: &View) {
        self.render(view);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChannelView {
    pub status: ScanStatus,
    pub label: &'static str,
    pub disabled: bool,
}

impl From<ScanStatus> for ChannelView {
    fn from(status: ScanStatus) -> Self {
        Self {
            status,
            label: status.label(),
            disabled: status == ScanStatus::Verified,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthView {
    pub fingerprint: ChannelView,
    pub face: ChannelView,
    pub unlocked: bool,
    pub chip: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub tags: String,
    pub share: String,
    pub selected: bool,
    pub visible: bool,
    pub vote_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BallotView {
    pub phase: BallotPhase,
    pub status: String,
    pub cards: Vec<CardView>,
}

impl BallotView {
    pub fn card(&self, id: &str) -> Option<&CardView> {
        self.cards.iter().find(|card| card.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub focused: bool,
    pub no_results: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModalView {
    pub open: bool,
    pub candidate: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatencyView {
    pub label: String,
    pub bar_width: f64,
}

impl From<LatencySample> for LatencyView {
    fn from(sample: LatencySample) -> Self {
        Self {
            label: sample.label(),
            bar_width: sample.bar_width,
        }
    }
}

/// Everything a surface needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct View {
    pub theme: Theme,
    pub auth: AuthView,
    pub camera_preview: bool,
    pub search: SearchView,
    pub ballot: BallotView,
    pub modal: ModalView,
    pub results: ResultsView,
    pub latency: Option<LatencyView>,
    pub activity: Vec<ActivityEntry>,
}

/// Keeps every frame. Used to drive the controller headlessly.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<View>,
    missing: Vec<Element>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without(elements: &[Element]) -> Self {
        Self {
            frames: Vec::new(),
            missing: elements.to_vec(),
        }
    }

    pub fn frames(&self) -> &[View] {
        &self.frames
    }

    pub fn last(&self) -> Option<&View> {
        self.frames.last()
    }
}

impl RenderSink for RecordingSink {
    fn provides(&self, element: Element) -> bool {
        !self.missing.contains(&element)
    }

    fn render(&mut self, view: &View) {
        self.frames.push(view.clone());
    }
}
