//! Terminal kiosk for the Nova ballot.
//!
//! Hosts a [`ballot::Controller`] on a single tokio task. Stdin lines stand
//! in for clicks and key presses, a short interval advances the controller's
//! clock by real elapsed time, and frames go to stdout. Logs go to stderr.
//!
//!
//!
//! # Setup
//!
//! Run the classic three-candidate kiosk.
//! ```sh
//! cargo run -p kiosk
//! ```
//!
//! Extended variant, JSON frames, debug logs.
//! ```sh
//! RUST_LOG=debug cargo run -p kiosk -- --variant extended --json
//! ```
//!
//!
//!
//! # Environment
//!
//! | Variable       | Default           |
//! |----------------|-------------------|
//! | `NOVA_VARIANT` | `classic`         |
//! | `NOVA_STORE`   | `nova-store.json` |
//! | `NOVA_ROSTER`  | unset             |
//! | `NOVA_SEED`    | unset             |
//! | `NOVA_TICK_MS` | `50`              |
//! | `NOVA_OUTPUT`  | `text`            |
//!
//! Command line flags win over the environment.
//!
//!
//!
//! # Commands
//!
//! `finger`, `face`, `vote <id>`, `confirm`, `cancel`, `backdrop`,
//! `type <text>`, `search <text>`, `/`, `esc`, `theme`, `show`, `quit`
use std::time::Duration;

use ballot::{Controller, FileStore, KeyValueStore, RenderSink};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader, stdin},
    signal,
    time::{Instant, MissedTickBehavior, interval},
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod terminal;

use camera::DeviceCamera;
use config::Config;
use error::KioskError;
use input::Command;
use terminal::TerminalSink;

pub fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

pub async fn start_kiosk(config: Config) -> Result<(), KioskError> {
    info!("Initializing state...");

    let ballot_config = config.ballot_config()?;
    let store = FileStore::open(&config.store_path)?;
    info!("Using store {}", store.path().display());

    let sink = TerminalSink::stdout(config.output);

    let mut controller = Controller::new(ballot_config, store, sink)?
        .with_camera(Box::new(DeviceCamera::default()));
    if let Some(seed) = config.seed {
        controller = controller.with_seed(seed);
    }

    info!("Starting kiosk ({})...", config.variant);
    controller.boot();

    run(&mut controller, config.tick).await;

    controller.shutdown();
    println!("Kiosk shutting down...");

    Ok(())
}

async fn run<S: KeyValueStore, R: RenderSink>(controller: &mut Controller<S, R>, tick: Duration) {
    let mut lines = BufReader::new(stdin()).lines();
    let mut stdin_open = true;

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                last = catch_up(controller, last);
            }
            line = lines.next_line(), if stdin_open => {
                last = catch_up(controller, last);

                match line {
                    Ok(Some(line)) => match line.parse::<Command>() {
                        Ok(Command::Quit) => {
                            info!("Quit requested");
                            break;
                        }
                        Ok(command) => command.apply(controller),
                        Err(e) => warn!("{e}"),
                    },
                    Ok(None) => {
                        info!("Input closed, telemetry keeps running until shutdown");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read input: {e}");
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

fn catch_up<S: KeyValueStore, R: RenderSink>(controller: &mut Controller<S, R>, last: Instant) -> Instant {
    let now = Instant::now();
    controller.advance(now.duration_since(last));

    now
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
