//! One command per stdin line, standing in for clicks and key presses.
use std::str::FromStr;

use ballot::{Controller, Key, KeyPress, KeyValueStore, RenderSink};
use tracing::{debug, warn};

use crate::error::KioskError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Fingerprint,
    Face,
    Vote(String),
    Confirm,
    Cancel,
    Backdrop,
    Type(String),
    Search(String),
    Slash,
    Escape,
    Theme,
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = KioskError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "finger" | "fingerprint" => Command::Fingerprint,
            "face" => Command::Face,
            "vote" if !rest.is_empty() => Command::Vote(rest.to_string()),
            "confirm" => Command::Confirm,
            "cancel" => Command::Cancel,
            "backdrop" => Command::Backdrop,
            "type" => Command::Type(rest.to_string()),
            "search" => Command::Search(rest.to_string()),
            "/" => Command::Slash,
            "esc" | "escape" => Command::Escape,
            "theme" => Command::Theme,
            "show" | "" => Command::Show,
            "quit" | "exit" => Command::Quit,
            _ => return Err(KioskError::UnknownCommand(line.to_string())),
        };

        Ok(command)
    }
}

impl Command {
    pub fn apply<S: KeyValueStore, R: RenderSink>(self, controller: &mut Controller<S, R>) {
        debug!(command = ?self, "Dispatching");

        match self {
            Command::Fingerprint => controller.press_fingerprint(),
            Command::Face => controller.press_face(),
            Command::Vote(id) => {
                if let Err(e) = controller.click_vote(&id) {
                    warn!("{e}");
                }
            }
            Command::Confirm => {
                if let Err(e) = controller.confirm() {
                    warn!("{e}");
                }
            }
            Command::Cancel => controller.cancel(),
            Command::Backdrop => controller.dismiss(),
            Command::Type(text) => controller.type_query(&text),
            Command::Search(text) => {
                controller.type_query(&text);
                controller.submit_search();
            }
            Command::Slash => {
                controller.press_key(KeyPress::plain(Key::Char('/')));
            }
            Command::Escape => {
                controller.press_key(KeyPress::plain(Key::Escape));
            }
            Command::Theme => controller.toggle_theme(),
            Command::Show => controller.redraw(),
            Command::Quit => {}
        }
    }
}
