//! Merge a submitted entry set back into fresh table text.
//!
//! Output is built in two steps. First every submitted entry is rendered, in
//! submission order. Then the fresh table is walked in order and every line
//! no entry claimed is carried over verbatim. Claimed lines are never
//! repeated, so an edited entry replaces its old line instead of sitting
//! next to it.
//!
//! Claims are one line per entry and one entry per line, and are resolved in
//! four passes so a precise match is never stolen by a looser one:
//!
//! 1. the entry's fetched `key` and verbatim `rawLine` together,
//! 2. the fetched `key` alone against task lines,
//! 3. the verbatim `rawLine` alone against any line,
//! 4. the entry's current canonical form against task lines.

use std::collections::HashSet;
use tracing::debug;

use crate::line::{match_task, Line, Table, DISABLED_PREFIX};
use crate::types::{Entry, EntryKey};

/// Result of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// The new table text, one `\n` after every line.
    pub text: String,
    /// Number of fresh-table lines claimed by submitted entries.
    pub claimed: usize,
    /// Task lines dropped because the client fetched them and left them out.
    pub deleted: Vec<String>,
}

/// Merges entries into one parsed copy of the table.
pub struct Reconciler<'a> {
    table: &'a Table,
    baseline: Option<HashSet<EntryKey>>,
}

impl<'a> Reconciler<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            baseline: None,
        }
    }

    /// Keys of the entries the client originally fetched.
    ///
    /// Without a baseline every unclaimed task line is preserved. With one,
    /// unclaimed task lines whose key is in the baseline are deleted; lines
    /// the client never saw are still preserved.
    pub fn with_baseline<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = EntryKey>,
    {
        self.baseline = Some(keys.into_iter().collect());
        self
    }

    pub fn reconcile(&self, submitted: &[Entry]) -> Reconciled {
        let claimed = self.claim(submitted);

        let mut text = String::new();
        for entry in submitted {
            push_line(&mut text, &render(entry));
        }

        let mut deleted = Vec::new();
        for (line, taken) in self.table.iter().zip(&claimed) {
            if *taken {
                continue;
            }
            if self.is_deleted(line) {
                deleted.push(line.text.clone());
                continue;
            }
            push_line(&mut text, &line.text);
        }

        let claimed = claimed.iter().filter(|taken| **taken).count();
        debug!(
            submitted = submitted.len(),
            claimed,
            deleted = deleted.len(),
            "reconciled table"
        );

        Reconciled {
            text,
            claimed,
            deleted,
        }
    }

    /// Mark which table lines are accounted for by `submitted`.
    fn claim(&self, submitted: &[Entry]) -> Vec<bool> {
        let lines = &self.table.lines;
        let line_keys: Vec<Option<EntryKey>> = lines.iter().map(Line::key).collect();
        let line_forms: Vec<Option<String>> =
            lines.iter().map(|l| l.task().map(|t| t.canonical())).collect();
        let entry_forms: Vec<String> = submitted.iter().map(content_form).collect();
        let mut claimed = vec![false; lines.len()];
        let mut owned = vec![false; submitted.len()];

        let mut pass = |want: &dyn Fn(usize, usize) -> bool| {
            for entry in 0..submitted.len() {
                if owned[entry] {
                    continue;
                }
                if let Some(at) = (0..lines.len()).find(|&line| !claimed[line] && want(entry, line)) {
                    claimed[at] = true;
                    owned[entry] = true;
                }
            }
        };

        let same_key = |entry: usize, line: usize| {
            let key = submitted[entry].key.as_str();
            !key.is_empty() && line_keys[line].as_ref().map(EntryKey::as_str) == Some(key)
        };
        let same_raw = |entry: usize, line: usize| {
            let raw = submitted[entry].raw_line.as_str();
            !raw.is_empty() && lines[line].text == raw
        };

        pass(&|entry: usize, line: usize| same_key(entry, line) && same_raw(entry, line));
        pass(&same_key);
        pass(&same_raw);
        pass(&|entry: usize, line: usize| {
            line_forms[line].as_deref() == Some(entry_forms[entry].as_str())
        });

        claimed
    }

    fn is_deleted(&self, line: &Line) -> bool {
        match (&self.baseline, line.key()) {
            (Some(baseline), Some(key)) => baseline.contains(&key),
            _ => false,
        }
    }
}

/// The task line `entry` renders to, as the parser would read it back.
///
/// Fields are opaque, so one may carry whitespace; re-reading the rendered
/// line moves such text across field boundaries exactly as a later parse will.
fn content_form(entry: &Entry) -> String {
    let canonical = entry.task().canonical();
    match match_task(&canonical) {
        Some(task) => task.canonical(),
        None => canonical,
    }
}

/// Render one submitted entry as a table line.
///
/// Enabled entries are written in canonical form. A disabled entry keeps
/// its original text (comment-prefixed if it was active) as long as its
/// fields still match that text; otherwise the canonical form is prefixed.
fn render(entry: &Entry) -> String {
    let task = entry.task();
    if entry.enabled {
        return task.canonical();
    }

    let raw = entry.raw_line.as_str();
    if raw.is_empty() {
        return task.canonical_disabled();
    }

    let edited = Line::classify(raw).task().is_some_and(|original| *original != task);
    if edited {
        task.canonical_disabled()
    } else if raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("{DISABLED_PREFIX}{raw}")
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Reconcile `submitted` against `fresh_raw` with no baseline.
pub fn reconcile(submitted: &[Entry], fresh_raw: &str) -> String {
    Reconciler::new(&Table::parse(fresh_raw))
        .reconcile(submitted)
        .text
}
