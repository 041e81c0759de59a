use serde::Serialize;
use tracing::warn;

use crate::line::{LineKind, Table};
use crate::types::Entry;

/// Entries projected from a table, plus the lines that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub entries: Vec<Entry>,
    /// Verbatim text of every unrecognized line, in table order. These lines
    /// survive reconciliation but are invisible to clients.
    pub skipped: Vec<String>,
}

impl Table {
    /// Project task lines into entries. Ids count from 1 within this table.
    pub fn entries(&self) -> Vec<Entry> {
        self.iter()
            .filter_map(|line| match &line.kind {
                LineKind::ActiveTask(task) => Some((task, line, true)),
                LineKind::DisabledTask(task) => Some((task, line, false)),
                _ => None,
            })
            .zip(1u64..)
            .map(|((task, line, enabled), id)| Entry::from_task(id, task, &line.text, enabled))
            .collect()
    }

    /// Verbatim text of the unrecognized lines.
    pub fn skipped(&self) -> Vec<String> {
        self.iter()
            .filter(|line| line.kind == LineKind::Unrecognized)
            .map(|line| line.text.clone())
            .collect()
    }
}

/// Parse raw table text into entries.
///
/// Blank lines, foreign comments, and environment assignments are not
/// entries. Unrecognized lines are logged and listed in
/// [`ParseOutcome::skipped`].
pub fn parse(raw: &str) -> ParseOutcome {
    let table = Table::parse(raw);
    let skipped = table.skipped();
    for line in &skipped {
        warn!(line = %line, "non-standard table line skipped");
    }
    ParseOutcome {
        entries: table.entries(),
        skipped,
    }
}
