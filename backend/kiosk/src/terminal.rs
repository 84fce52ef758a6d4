use std::{
    fmt::{self, Write as _},
    io::{self, Write},
    str::FromStr,
};

use ballot::{RenderSink, View};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Output {
    #[default]
    Text,
    Json,
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Output::Text),
            "json" => Ok(Output::Json),
            other => Err(format!("unknown output {other:?}, expected text or json")),
        }
    }
}

/// Writes each frame to a terminal, either as a text panel or one JSON
/// object per line. Identical consecutive frames are skipped.
pub struct TerminalSink<W> {
    out: W,
    output: Output,
    last: Option<String>,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(output: Output) -> Self {
        Self::new(io::stdout(), output)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, output: Output) -> Self {
        Self {
            out,
            output,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn encode(&self, view: &View) -> Option<String> {
        match self.output {
            Output::Text => Some(format_frame(view)),
            Output::Json => serde_json::to_string(view)
                .map_err(|e| warn!("Failed to encode frame: {e}"))
                .ok()
                .map(|json| json + "\n"),
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, view: &View) {
        let Some(frame) = self.encode(view) else {
            return;
        };

        if self.last.as_deref() == Some(frame.as_str()) {
            return;
        }

        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Failed to write frame: {e}");
        }

        self.last = Some(frame);
    }

    fn redraw(&mut self, view: &View) {
        self.last = None;
        self.render(view);
    }
}

pub fn format_frame(view: &View) -> String {
    let mut frame = String::new();

    // Writing into a String cannot fail.
    let _ = write_frame(&mut frame, view);

    frame
}

fn write_frame(f: &mut String, view: &View) -> fmt::Result {
    writeln!(f, "== NOVA BALLOT == theme: {}", view.theme)?;
    writeln!(
        f,
        "Fingerprint: {} | Face: {} | {}",
        view.auth.fingerprint.label, view.auth.face.label, view.auth.chip
    )?;

    if view.camera_preview {
        writeln!(f, "[camera preview]")?;
    }

    let cursor = if view.search.focused { "_" } else { "" };
    writeln!(f, "Search: {}{cursor}", view.search.query)?;

    for card in view.ballot.cards.iter().filter(|card| card.visible) {
        writeln!(
            f,
            "  {} {:<8} {:<14} {:>6}  {}{}",
            if card.selected { "[x]" } else { "[ ]" },
            card.id,
            card.name,
            card.share,
            card.tags,
            if card.vote_enabled { "" } else { "  (locked)" },
        )?;
    }

    if let Some(query) = &view.search.no_results {
        writeln!(f, "  No candidates match \"{query}\"")?;
    }

    writeln!(f, "Status: {}", view.ballot.status)?;

    let shares: Vec<String> = view
        .results
        .rows
        .iter()
        .map(|row| format!("{} {}", row.id, row.label))
        .collect();
    write!(
        f,
        "Results: {} | turnout {} | {}",
        shares.join(" | "),
        view.results.turnout.label,
        view.results.secured
    )?;

    match &view.latency {
        Some(latency) => writeln!(f, " | latency {}", latency.label)?,
        None => writeln!(f)?,
    }

    if let Some(candidate) = &view.modal.candidate {
        writeln!(f, "Confirm vote for {candidate}? (confirm / cancel)")?;
    }

    writeln!(f, "Activity:")?;
    for entry in &view.activity {
        writeln!(f, "  {:<6} {}", entry.tag, entry.message)?;
    }

    writeln!(f)
}
