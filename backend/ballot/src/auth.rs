//! # Biometric Simulator
//!
//! Two independent channels, fingerprint and face. Each goes
//! `Ready -> Scanning -> Verified` and never leaves `Verified`.
//!
//! Neither channel checks anything. Fingerprint is a plain delay. Face shows
//! a camera preview when one can be acquired and falls back to a shorter
//! delay otherwise; both paths end verified.
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    activity::ActivityTag, controller::Controller, render::RenderSink, scheduler::Timer,
    storage::KeyValueStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Ready,
    Scanning,
    Verified,
}

impl ScanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ScanStatus::Ready => "Ready",
            ScanStatus::Scanning => "Scanning…",
            ScanStatus::Verified => "Verified",
        }
    }

    fn of(verified: bool, scanning: bool) -> Self {
        match (verified, scanning) {
            (true, _) => ScanStatus::Verified,
            (false, true) => ScanStatus::Scanning,
            (false, false) => ScanStatus::Ready,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Scanning {
    pub fingerprint: bool,
    pub face: bool,
}

impl<S: KeyValueStore, R: RenderSink> Controller<S, R> {
    pub fn fingerprint_status(&self) -> ScanStatus {
        ScanStatus::of(self.state.auth.fingerprint, self.scanning.fingerprint)
    }

    pub fn face_status(&self) -> ScanStatus {
        ScanStatus::of(self.state.auth.face, self.scanning.face)
    }

    pub fn press_fingerprint(&mut self) {
        if self.fingerprint_status() != ScanStatus::Ready {
            return;
        }

        self.scanning.fingerprint = true;
        self.activity.push(ActivityTag::Scan, "Fingerprint pattern requested");

        let delay = self.config.fingerprint_delay;
        self.scheduler.schedule(delay, Timer::FingerprintScan);

        self.render();
    }

    pub fn press_face(&mut self) {
        if self.face_status() != ScanStatus::Ready {
            return;
        }

        self.scanning.face = true;
        self.activity.push(ActivityTag::Scan, "Face recognition requested");

        let camera = self.stream.is_none() && self.open_camera();
        let delay = if camera {
            self.config.face_camera_delay
        } else {
            self.config.face_fallback_delay
        };
        self.scheduler.schedule(delay, Timer::FaceScan { camera });

        self.render();
    }

    fn open_camera(&mut self) -> bool {
        match self.camera.acquire() {
            Ok(stream) => {
                info!("Camera preview on {}", stream.label());
                self.stream = Some(stream);
                true
            }
            Err(e) => {
                warn!("Camera not available: {e}");
                false
            }
        }
    }

    pub(crate) fn on_fingerprint_scanned(&mut self) {
        self.scanning.fingerprint = false;
        self.state.auth.fingerprint = true;
        self.activity.push(ActivityTag::Access, "Fingerprint accepted");

        self.refresh_vote_status();
        self.persist();
        self.render();
    }

    pub(crate) fn on_face_scanned(&mut self, camera: bool) {
        if camera {
            self.release_camera();
        }

        self.scanning.face = false;
        self.state.auth.face = true;
        self.activity.push(ActivityTag::Access, "Face ID accepted");

        self.refresh_vote_status();
        self.persist();
        self.render();
    }

    pub(crate) fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}
