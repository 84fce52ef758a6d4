//! # Nova Ballot
//!
//! Headless controller behind a biometric-gated voting kiosk demo.
//!
//! Everything here is theatre: the biometrics never check anything, the live
//! feed is random noise and the only durable state is a small local
//! key-value record any user could edit. What is real is the gating:
//!
//! - No vote without at least one verified biometric channel
//! - One vote per device, after which the ballot locks
//! - Counts only ever go up
//!
//!
//!
//! # Event Model
//!
//! Single threaded. The host feeds the [`Controller`] one event at a time
//! (clicks, keys, search input) and advances its virtual clock; each handler
//! runs to completion, mutates the [`SessionState`], persists what changed
//! and pushes a fresh [`View`] to the [`RenderSink`].
//!
//! Timers (scan delays, search debounce, telemetry ticks) live in a
//! [`Scheduler`] so tests can step time deterministically.
//!
//!
//!
//! # Variants
//!
//! | Variant  | Candidates | Live vote chance | Turnout cap | Feed length |
//! |----------|------------|------------------|-------------|-------------|
//! | classic  | 3          | 0.45             | 14          | 9           |
//! | extended | 4          | 0.40             | 18          | 10          |
//!
//!
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use ballot::{BallotConfig, Controller, MemoryStore, RecordingSink, Variant, VoteOutcome};
//!
//! let config = BallotConfig::for_variant(Variant::Classic);
//! let mut controller = Controller::new(config, MemoryStore::new(), RecordingSink::new())
//!     .unwrap()
//!     .with_seed(7);
//! controller.boot();
//!
//! controller.press_fingerprint();
//! controller.advance(Duration::from_millis(1300));
//!
//! controller.click_vote("lyra").unwrap();
//! let outcome = controller.confirm().unwrap();
//! assert!(matches!(outcome, VoteOutcome::Cast { .. }));
//! assert!(controller.is_locked());
//! ```
pub mod activity;
pub mod auth;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod results;
pub mod scheduler;
pub mod search;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod vote;

pub use activity::{ActivityEntry, ActivityLog, ActivityTag};
pub use auth::ScanStatus;
pub use camera::{Camera, CameraStream, NoCamera};
pub use config::{BallotConfig, Variant};
pub use controller::Controller;
pub use error::{BallotError, CameraError};
pub use render::{Element, RecordingSink, RenderSink, View};
pub use scheduler::{Scheduler, Timer, TimerHandle};
pub use search::{Key, KeyPress};
pub use state::{AuthFlags, SessionState, Tally, Theme};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistedRecord};
pub use vote::{BallotPhase, Rejection, VoteOutcome};
