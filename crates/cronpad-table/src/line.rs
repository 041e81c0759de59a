use regex::Regex;
use std::sync::LazyLock;

use crate::types::{EntryKey, Task};

/// Five whitespace-delimited schedule fields, then the rest of the line.
static TASK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(.*)$").expect("task pattern compiles")
});

/// Prefix that marks a task as disabled.
pub const DISABLED_PREFIX: &str = "# ";

/// What a single table line is, decided once when the table is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// An uncommented task.
    ActiveTask(Task),
    /// `# ` followed by something that reads as a task.
    DisabledTask(Task),
    /// Any other comment.
    ForeignComment,
    /// Looks like `NAME=value`.
    EnvAssignment,
    /// None of the above. Kept verbatim but not shown to clients.
    Unrecognized,
}

/// A verbatim table line and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    /// Classify `text`. Rules apply in order; the first match wins.
    pub fn classify(text: &str) -> Self {
        let kind = if text.trim().is_empty() {
            LineKind::Blank
        } else if let Some(rest) = text.strip_prefix(DISABLED_PREFIX) {
            match match_task(rest) {
                Some(task) => LineKind::DisabledTask(task),
                None => LineKind::ForeignComment,
            }
        } else if text.starts_with('#') {
            LineKind::ForeignComment
        } else if text.contains('=') && !text.starts_with('*') {
            LineKind::EnvAssignment
        } else {
            match match_task(text) {
                Some(task) => LineKind::ActiveTask(task),
                None => LineKind::Unrecognized,
            }
        };

        Self {
            text: text.to_string(),
            kind,
        }
    }

    /// The task on this line, active or disabled.
    pub fn task(&self) -> Option<&Task> {
        match &self.kind {
            LineKind::ActiveTask(task) | LineKind::DisabledTask(task) => Some(task),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<EntryKey> {
        self.task().map(Task::key)
    }
}

/// Match `text` against the six-group task pattern.
pub(crate) fn match_task(text: &str) -> Option<Task> {
    let caps = TASK_PATTERN.captures(text)?;
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    Some(Task {
        minute: field(1),
        hour: field(2),
        day_of_month: field(3),
        month: field(4),
        day_of_week: field(5),
        command: field(6).trim().to_string(),
    })
}

/// The ordered, classified lines of one copy of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub lines: Vec<Line>,
}

impl Table {
    /// Split on `\n` (dropping a trailing `\r`) and classify every line.
    pub fn parse(raw: &str) -> Self {
        Self {
            lines: raw.lines().map(Line::classify).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}
