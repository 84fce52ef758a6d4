//! # Candidate Search
//!
//! Case-insensitive substring match against a card's name, tags and id.
//!
//! - Typing is debounced so the grid is not refiltered on every keystroke
//! - Submitting runs the filter straight away
//! - `/` focuses the field, `Escape` blurs and clears it
//! - An empty result for a non-empty query echoes the query back
use bank::candidates::{Candidate, Roster};
use serde::Serialize;
use tracing::debug;

use crate::{
    controller::Controller,
    render::RenderSink,
    scheduler::{Timer, TimerHandle},
    storage::KeyValueStore,
};

pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// `needle` must already be normalized. An empty needle matches everything.
pub fn matches(candidate: &Candidate, needle: &str) -> bool {
    needle.is_empty()
        || candidate.name.to_lowercase().contains(needle)
        || candidate.tag_line().to_lowercase().contains(needle)
        || candidate.id.to_lowercase().contains(needle)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub visible: Vec<String>,
    /// Set to the normalized query when nothing matched it.
    pub no_results: Option<String>,
}

impl SearchOutcome {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|visible| visible == id)
    }
}

pub fn filter(roster: &Roster, query: &str) -> SearchOutcome {
    let needle = normalize(query);

    let visible: Vec<String> = roster
        .iter()
        .filter(|candidate| matches(candidate, &needle))
        .map(|candidate| candidate.id.clone())
        .collect();

    let no_results = (!needle.is_empty() && visible.is_empty()).then_some(needle);

    SearchOutcome {
        visible,
        no_results,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            alt: false,
        }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

#[derive(Debug, Default)]
pub struct SearchField {
    pub value: String,
    pub focused: bool,
    pub(crate) debounce: Option<TimerHandle>,
    pub outcome: SearchOutcome,
}

impl<S: KeyValueStore, R: RenderSink> Controller<S, R> {
    /// Input event on the search field. Filtering waits for the debounce.
    pub fn type_query(&mut self, value: &str) {
        self.search.value = value.to_string();
        self.cancel_search_debounce();

        let delay = self.config.search_debounce;
        self.search.debounce = Some(self.scheduler.schedule(delay, Timer::SearchDebounce));

        self.render();
    }

    /// Explicit search event, filters immediately.
    pub fn submit_search(&mut self) {
        self.cancel_search_debounce();
        self.run_search();
        self.render();
    }

    /// Returns whether the key was handled.
    pub fn press_key(&mut self, press: KeyPress) -> bool {
        match press.key {
            Key::Char('/') if !self.search.focused && !press.has_modifier() => {
                self.search.focused = true;
                self.render();
                true
            }
            Key::Escape => {
                self.search.focused = false;
                self.search.value.clear();
                self.cancel_search_debounce();
                self.run_search();
                self.render();
                true
            }
            _ => false,
        }
    }

    pub fn set_search_focus(&mut self, focused: bool) {
        self.search.focused = focused;
        self.render();
    }

    pub(crate) fn on_search_debounce(&mut self) {
        self.search.debounce = None;
        self.run_search();
        self.render();
    }

    pub(crate) fn run_search(&mut self) {
        self.search.outcome = filter(&self.config.roster, &self.search.value);

        debug!(
            query = %self.search.value,
            visible = self.search.outcome.visible.len(),
            "Search applied"
        );
    }

    fn cancel_search_debounce(&mut self) {
        if let Some(handle) = self.search.debounce.take() {
            self.scheduler.cancel(handle);
        }
    }
}
