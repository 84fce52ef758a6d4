use std::{path::PathBuf, process::ExitCode};

use ballot::Variant;
use clap::Parser;
use kiosk::{config::Config, init_logging, start_kiosk, terminal::Output};
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// classic or extended
    #[arg(long)]
    variant: Option<Variant>,

    #[arg(long)]
    store: Option<PathBuf>,

    /// JSON roster replacing the variant's candidates
    #[arg(long)]
    roster: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Emit frames as JSON lines
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(store) = self.store {
            config.store_path = store;
        }
        if self.roster.is_some() {
            config.roster_path = self.roster;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.json {
            config.output = Output::Json;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    match start_kiosk(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
