//! Synthetic telemetry: latency jitter and random "live" votes.
//!
//! Runs on a fixed interval from boot until shutdown, whatever the auth or
//! ballot state.
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::{
    activity::ActivityTag, config::BallotConfig, controller::Controller, render::RenderSink,
    scheduler::Timer, storage::KeyValueStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatencySample {
    pub ms: u32,
    pub bar_width: f64,
}

impl LatencySample {
    /// `unit` is a uniform draw from `[0, 1)`.
    pub fn from_unit(unit: f64, config: &BallotConfig) -> Self {
        let ms = (config.latency_floor_ms + unit * config.latency_spread_ms).round();
        let bar_width = (ms / config.latency_ceiling_ms() * 60.0 + 20.0).min(100.0);

        Self {
            ms: ms as u32,
            bar_width,
        }
    }

    pub fn label(&self) -> String {
        format!("{} ms", self.ms)
    }
}

impl<S: KeyValueStore, R: RenderSink> Controller<S, R> {
    pub(crate) fn start_telemetry(&mut self) {
        if self.telemetry.is_none() {
            let interval = self.config.telemetry_interval;
            self.telemetry = Some(self.scheduler.schedule(interval, Timer::TelemetryTick));
        }
    }

    pub(crate) fn on_telemetry_tick(&mut self) {
        let unit = self.rng.gen_range(0.0..1.0);
        self.latency = Some(LatencySample::from_unit(unit, &self.config));

        if self.rng.gen_range(0.0..1.0) < self.config.noise_probability && !self.config.roster.is_empty() {
            let index = self.rng.gen_range(0..self.config.roster.len());
            let id = self.config.roster.candidates[index].id.clone();

            if let Ok(count) = self.state.tally.increment(&id) {
                debug!(candidate = %id, count, "Live vote injected");
                self.activity.push(ActivityTag::Live, format!("New packet · {id}"));
            }
        }

        let interval = self.config.telemetry_interval;
        self.telemetry = Some(self.scheduler.schedule(interval, Timer::TelemetryTick));

        self.render();
    }
}
