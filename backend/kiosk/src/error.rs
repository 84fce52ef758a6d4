use ballot::BallotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KioskError {
    #[error("Invalid {key} value: {message}")]
    Config { key: String, message: String },

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Ballot(#[from] BallotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
