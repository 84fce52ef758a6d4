use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    activity::{ActivityLog, ActivityTag},
    auth::Scanning,
    camera::{Camera, CameraStream, NoCamera},
    config::BallotConfig,
    error::BallotError,
    render::{AuthView, BallotView, CardView, Element, ModalView, RenderSink, SearchView, View},
    results::ResultsView,
    scheduler::{Scheduler, Timer, TimerHandle},
    search::SearchField,
    state::{SessionState, Theme},
    storage::{KeyValueStore, PersistedRecord, save_session, save_theme},
    telemetry::LatencySample,
    vote::BallotPhase,
};

/// Owns the session and reacts to one event at a time.
pub struct Controller<S, R> {
    pub(crate) config: BallotConfig,
    pub(crate) state: SessionState,
    pub(crate) theme: Theme,
    pub(crate) activity: ActivityLog,
    pub(crate) scheduler: Scheduler,
    pub(crate) store: S,
    pub(crate) sink: R,
    pub(crate) camera: Box<dyn Camera>,
    pub(crate) stream: Option<Box<dyn CameraStream>>,
    pub(crate) rng: StdRng,
    pub(crate) scanning: Scanning,
    pub(crate) pending: Option<String>,
    pub(crate) vote_status: String,
    pub(crate) search: SearchField,
    pub(crate) latency: Option<LatencySample>,
    pub(crate) telemetry: Option<TimerHandle>,
}

impl<S: KeyValueStore, R: RenderSink> Controller<S, R> {
    /// Checks the render surface and rehydrates from the store.
    pub fn new(config: BallotConfig, store: S, sink: R) -> Result<Self, BallotError> {
        if let Some(element) = Element::ALL
            .into_iter()
            .find(|element| element.is_required() && !sink.provides(*element))
        {
            return Err(BallotError::MissingElement(element));
        }

        let record = PersistedRecord::load(&store, &config.roster);
        debug!(?record, "Restored local record");

        let mut state = SessionState::new(&config.roster);
        state.auth = record.auth;
        state.user.selected = record.choice;
        if record.has_voted {
            state.user.lock();
        }

        let mut controller = Self {
            activity: ActivityLog::new(config.activity_cap),
            config,
            state,
            theme: record.theme.unwrap_or_default(),
            scheduler: Scheduler::new(),
            store,
            sink,
            camera: Box::new(NoCamera),
            stream: None,
            rng: StdRng::from_entropy(),
            scanning: Scanning::default(),
            pending: None,
            vote_status: String::new(),
            search: SearchField::default(),
            latency: None,
            telemetry: None,
        };
        controller.refresh_vote_status();

        Ok(controller)
    }

    pub fn with_camera(mut self, camera: Box<dyn Camera>) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// First frame, initial search and the telemetry loop.
    pub fn boot(&mut self) {
        self.run_search();
        self.start_telemetry();

        match (&self.state.user.selected, self.state.user.has_voted()) {
            (Some(id), true) => {
                let message = format!("Existing ballot · {id}");
                self.activity.push(ActivityTag::Sync, message);
            }
            _ => self.activity.push(ActivityTag::Boot, "Interface online"),
        }

        info!(
            candidates = self.config.roster.len(),
            phase = ?self.phase(),
            "Interface online"
        );

        self.render();
    }

    /// Moves the virtual clock forward, firing every timer that comes due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;

        while let Some((handle, timer)) = self.scheduler.pop_due(until) {
            self.fire(handle, timer);
        }

        self.scheduler.settle(until);
    }

    fn fire(&mut self, handle: TimerHandle, timer: Timer) {
        debug!(?handle, ?timer, at = ?self.scheduler.now(), "Timer fired");

        match timer {
            Timer::FingerprintScan => self.on_fingerprint_scanned(),
            Timer::FaceScan { camera } => self.on_face_scanned(camera),
            Timer::SearchDebounce => self.on_search_debounce(),
            Timer::TelemetryTick => self.on_telemetry_tick(),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();

        if let Err(e) = save_theme(&mut self.store, self.theme) {
            warn!("Failed to persist theme: {e}");
        }

        self.render();
    }

    /// Stops the telemetry loop, drops pending timers and releases the camera.
    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        self.telemetry = None;
        self.search.debounce = None;
        self.release_camera();

        info!(total = self.state.tally.total(), "Controller stopped");
    }

    pub(crate) fn persist(&mut self) {
        if let Err(e) = save_session(&mut self.store, &self.state) {
            warn!("Failed to persist session: {e}");
        }
    }

    pub(crate) fn render(&mut self) {
        let view = self.view();
        self.sink.render(&view);
    }

    pub fn redraw(&mut self) {
        let view = self.view();
        self.sink.redraw(&view);
    }

    pub fn view(&self) -> View {
        let results = ResultsView::build(&self.state.tally, self.config.turnout_cap);
        let unlocked = self.state.auth.is_verified();
        let vote_enabled = self.state.can_vote();

        let cards = self
            .config
            .roster
            .iter()
            .map(|candidate| CardView {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                tags: candidate.tag_line(),
                share: results
                    .row(&candidate.id)
                    .map(|row| row.label.clone())
                    .unwrap_or_default(),
                selected: self.state.user.selected.as_deref() == Some(candidate.id.as_str()),
                visible: self.search.outcome.is_visible(&candidate.id),
                vote_enabled,
            })
            .collect();

        View {
            theme: self.theme,
            auth: AuthView {
                fingerprint: self.fingerprint_status().into(),
                face: self.face_status().into(),
                unlocked,
                chip: if unlocked {
                    "Unlocked · biometrics OK"
                } else {
                    "Locked · verify to vote"
                },
            },
            camera_preview: self.stream.is_some(),
            search: SearchView {
                query: self.search.value.clone(),
                focused: self.search.focused,
                no_results: self.search.outcome.no_results.clone(),
            },
            ballot: BallotView {
                phase: self.phase(),
                status: self.vote_status.clone(),
                cards,
            },
            modal: ModalView {
                open: self.pending.is_some(),
                candidate: self.pending.clone(),
            },
            results,
            latency: self.latency.map(Into::into),
            activity: self.activity.iter().cloned().collect(),
        }
    }

    pub fn config(&self) -> &BallotConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn vote_status(&self) -> &str {
        &self.vote_status
    }

    pub fn search(&self) -> &SearchField {
        &self.search
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn is_locked(&self) -> bool {
        self.phase() == BallotPhase::Locked
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
