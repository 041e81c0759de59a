use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// The five schedule fields plus the command of one table line.
///
/// Fields are opaque tokens; `*/5` and `banana` are treated alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
    pub command: String,
}

impl Task {
    /// The single-space-joined six-field form of this task.
    pub fn canonical(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week, self.command
        )
    }

    /// The canonical form behind a `# ` prefix.
    pub fn canonical_disabled(&self) -> String {
        format!("# {}", self.canonical())
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::of(self)
    }
}

// ---------------------------------------------------------------------------
// EntryKey
// ---------------------------------------------------------------------------

/// Structural identity of a task: a digest of its fields and command.
///
/// Enabled state is not part of the key, so toggling a task keeps its
/// identity. Two identical lines share a key; claims are counted one for one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(pub String);

impl EntryKey {
    pub fn of(task: &Task) -> Self {
        let mut hasher = Sha256::new();
        for part in [
            &task.minute,
            &task.hour,
            &task.day_of_month,
            &task.month,
            &task.day_of_week,
            &task.command,
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One schedulable unit as exchanged with clients.
///
/// Every field is optional on decode; a missing field reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    /// Position within the parse that produced this entry (1-based).
    /// Display-only; never used to match entries to lines.
    pub id: u64,
    /// Structural identity assigned at fetch time. Clients echo it back
    /// unchanged, even after editing fields.
    pub key: String,
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
    pub command: String,
    /// Verbatim source line, empty for entries created client-side.
    pub raw_line: String,
    /// Passed through untouched.
    pub comment: String,
    pub enabled: bool,
}

impl Entry {
    pub(crate) fn from_task(id: u64, task: &Task, raw_line: &str, enabled: bool) -> Self {
        Self {
            id,
            key: task.key().0,
            minute: task.minute.clone(),
            hour: task.hour.clone(),
            day_of_month: task.day_of_month.clone(),
            month: task.month.clone(),
            day_of_week: task.day_of_week.clone(),
            command: task.command.clone(),
            raw_line: raw_line.to_string(),
            comment: String::new(),
            enabled,
        }
    }

    /// The task as currently described by this entry's fields.
    pub fn task(&self) -> Task {
        Task {
            minute: self.minute.clone(),
            hour: self.hour.clone(),
            day_of_month: self.day_of_month.clone(),
            month: self.month.clone(),
            day_of_week: self.day_of_week.clone(),
            command: self.command.clone(),
        }
    }

    /// Text fields paired with their wire names, for validation.
    pub(crate) fn text_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("minute", &self.minute),
            ("hour", &self.hour),
            ("dayOfMonth", &self.day_of_month),
            ("month", &self.month),
            ("dayOfWeek", &self.day_of_week),
            ("command", &self.command),
            ("rawLine", &self.raw_line),
            ("key", &self.key),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backup() -> Task {
        Task {
            minute: "0".into(),
            hour: "3".into(),
            day_of_month: "*".into(),
            month: "*".into(),
            day_of_week: "*".into(),
            command: "/bin/backup.sh --full".into(),
        }
    }

    #[test]
    fn canonical_joins_with_single_spaces() {
        assert_eq!(backup().canonical(), "0 3 * * * /bin/backup.sh --full");
        assert_eq!(
            backup().canonical_disabled(),
            "# 0 3 * * * /bin/backup.sh --full"
        );
    }

    #[test]
    fn key_is_deterministic_and_field_sensitive() {
        let a = backup();
        let mut b = backup();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().as_str().len(), 16);

        b.command = "/bin/backup.sh".into();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn key_does_not_confuse_field_boundaries() {
        let mut a = backup();
        a.day_of_week = "1".into();
        a.command = "2 run".into();
        let mut b = backup();
        b.day_of_week = "1 2".into();
        b.command = "run".into();
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn entry_serializes_with_camel_case_names() {
        let entry = Entry::from_task(7, &backup(), "0 3 * * * /bin/backup.sh --full", true);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["dayOfMonth"], "*");
        assert_eq!(json["dayOfWeek"], "*");
        assert_eq!(json["rawLine"], "0 3 * * * /bin/backup.sh --full");
        assert_eq!(json["comment"], "");
        assert_eq!(json["enabled"], true);
        assert_eq!(json["key"], backup().key().as_str());
    }

    #[test]
    fn entry_decodes_with_missing_fields() {
        let entry: Entry =
            serde_json::from_str(r#"{"minute":"5","command":"/bin/true","enabled":true}"#).unwrap();
        assert_eq!(entry.minute, "5");
        assert_eq!(entry.hour, "");
        assert_eq!(entry.raw_line, "");
        assert!(entry.key.is_empty());
        assert!(entry.enabled);
    }
}
