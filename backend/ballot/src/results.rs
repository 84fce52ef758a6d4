//! Share, turnout and secured-vote figures for the results board.
use serde::Serialize;

use crate::state::Tally;

/// `count / max(total, 1) * 100`.
pub fn share(count: u64, total: u64) -> f64 {
    count as f64 / total.max(1) as f64 * 100.0
}

/// Cosmetic turnout against an arbitrary cap, clamped to 100.
pub fn turnout(total: u64, cap: u64) -> f64 {
    (total as f64 / cap.max(1) as f64).min(1.0) * 100.0
}

/// One decimal place, with ties rounded away from zero.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", (value * 10.0).round() / 10.0)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRow {
    pub id: String,
    pub share: f64,
    /// Doubles as the bar width.
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Meter {
    pub percent: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultsView {
    pub rows: Vec<ResultRow>,
    pub total: u64,
    pub secured: String,
    pub turnout: Meter,
}

impl ResultsView {
    pub fn build(tally: &Tally, turnout_cap: u64) -> Self {
        let total = tally.total();

        let rows = tally
            .iter()
            .map(|(id, count)| {
                let share = share(count, total);
                ResultRow {
                    id: id.to_string(),
                    share,
                    label: format_percent(share),
                }
            })
            .collect();

        let turnout = turnout(total, turnout_cap);

        Self {
            rows,
            total,
            secured: format!("{total} secured"),
            turnout: Meter {
                percent: turnout,
                label: format_percent(turnout),
            },
        }
    }

    pub fn row(&self, id: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}
