// Drives CrontabCli against a shell script that behaves like `crontab`.
#![cfg(unix)]

use cronpad_store::{BackingStore, CrontabCli, StoreError, TableManager};
use std::{path::Path, sync::Arc, time::Duration};
use tempfile::TempDir;

/// Emulates `crontab [-u user] -l` and `crontab [-u user] <file>` on top of
/// a `table` file in the same directory. Every invocation appends its
/// arguments to `calls`. A `fail-list` marker file makes listing fail; any
/// line containing REJECT makes installing fail.
const FAKE_CRONTAB: &str = r#"
dir=$(dirname "$0")
echo "$@" >> "$dir/calls"
if [ "$1" = "-u" ]; then shift 2; fi
case "$1" in
  -l)
    if [ -f "$dir/fail-list" ]; then
      echo "crontab: permission denied" >&2
      exit 2
    fi
    if [ -f "$dir/table" ]; then
      cat "$dir/table"
    else
      echo "no crontab for tester" >&2
      exit 1
    fi
    ;;
  *)
    if grep -q REJECT "$1"; then
      echo "\"$1\":1: bad minute"
      echo "errors in crontab file, can't install." >&2
      exit 1
    fi
    cp "$1" "$dir/table"
    ;;
esac
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("fake-crontab.sh"), FAKE_CRONTAB).expect("write script");
        Self { dir }
    }

    fn cli(&self) -> CrontabCli {
        let script = self.dir.path().join("fake-crontab.sh");
        CrontabCli::new("sh")
            .with_args([script.to_string_lossy().into_owned()])
            .with_temp_dir(self.dir.path())
            .with_timeout(Duration::from_secs(10))
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn table(&self) -> Option<String> {
        std::fs::read_to_string(self.path("table")).ok()
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Transient files left behind in the fixture directory.
    fn leftovers(&self) -> Vec<String> {
        std::fs::read_dir(self.dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("cronpad-"))
            .collect()
    }
}

#[tokio::test]
async fn missing_table_reads_as_empty() {
    let fx = Fixture::new();
    assert_eq!(fx.cli().read().await.unwrap(), "");
    assert_eq!(fx.calls(), vec!["-l"]);
}

#[tokio::test]
async fn list_failure_carries_stderr() {
    let fx = Fixture::new();
    std::fs::write(fx.path("fail-list"), "").unwrap();
    match fx.cli().read().await.unwrap_err() {
        StoreError::ListFailed { status, output } => {
            assert_eq!(status, "exit status 2");
            assert_eq!(output, "crontab: permission denied");
        }
        other => panic!("expected list failure, got {other:?}"),
    }
}

#[tokio::test]
async fn replace_installs_and_removes_transient_file() {
    let fx = Fixture::new();
    let cli = fx.cli();
    cli.replace("*/5 * * * * /usr/bin/foo\n").await.unwrap();

    assert_eq!(fx.table().as_deref(), Some("*/5 * * * * /usr/bin/foo\n"));
    assert_eq!(cli.read().await.unwrap(), "*/5 * * * * /usr/bin/foo\n");

    let calls = fx.calls();
    let installed_from = Path::new(&calls[0]);
    assert!(installed_from.starts_with(fx.dir.path()));
    assert!(!installed_from.exists());
    assert!(fx.leftovers().is_empty());
}

#[tokio::test]
async fn rejected_install_reports_combined_output_and_cleans_up() {
    let fx = Fixture::new();
    std::fs::write(fx.path("table"), "FOO=bar\n").unwrap();

    let err = fx.cli().replace("REJECT * * * * x\n").await.unwrap_err();
    match err {
        StoreError::InstallFailed { status, output } => {
            assert_eq!(status, "exit status 1");
            assert!(output.contains("bad minute"));
            assert!(output.contains("errors in crontab file, can't install."));
        }
        other => panic!("expected install failure, got {other:?}"),
    }
    assert_eq!(fx.table().as_deref(), Some("FOO=bar\n"));
    assert!(fx.leftovers().is_empty());
}

#[tokio::test]
async fn non_utf8_table_is_refused_and_left_intact() {
    let fx = Fixture::new();
    let original: &[u8] = b"# caf\xe9 jobs\n*/5 * * * * /usr/bin/foo\n";
    std::fs::write(fx.path("table"), original).unwrap();

    match fx.cli().read().await.unwrap_err() {
        StoreError::Encoding { offset } => assert_eq!(offset, 5),
        other => panic!("expected encoding error, got {other:?}"),
    }

    let mgr = TableManager::new(Arc::new(fx.cli()));
    let err = mgr
        .save(&cronpad_table::SaveRequest::new(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Encoding { .. }));

    assert_eq!(std::fs::read(fx.path("table")).unwrap(), original);
    assert!(fx.calls().iter().all(|call| call == "-l"));
}

#[tokio::test]
async fn unwritable_temp_dir_fails_before_invoking_store() {
    let fx = Fixture::new();
    std::fs::write(fx.path("table"), "FOO=bar\n").unwrap();

    let cli = fx.cli().with_temp_dir(fx.path("missing-dir"));
    match cli.replace("* * * * * ping\n").await.unwrap_err() {
        StoreError::TempFile(_) => {}
        other => panic!("expected transient file error, got {other:?}"),
    }

    assert!(fx.calls().is_empty());
    assert_eq!(fx.table().as_deref(), Some("FOO=bar\n"));
}

#[tokio::test]
async fn user_flag_precedes_operation() {
    let fx = Fixture::new();
    let cli = fx.cli().with_user("alice");
    cli.read().await.unwrap();
    assert_eq!(fx.calls(), vec!["-u alice -l"]);
}

#[tokio::test]
async fn slow_store_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("slow.sh");
    std::fs::write(&script, "sleep 5\n").unwrap();

    let cli = CrontabCli::new("sh")
        .with_args([script.to_string_lossy().into_owned()])
        .with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let err = cli.read().await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout { ms: 200 }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let cli = CrontabCli::new("/nonexistent/cronpad-test-crontab");
    match cli.read().await.unwrap_err() {
        StoreError::Spawn { program, .. } => {
            assert_eq!(program, "/nonexistent/cronpad-test-crontab")
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
}

#[tokio::test]
async fn manager_round_trip_through_cli() {
    let fx = Fixture::new();
    std::fs::write(
        fx.path("table"),
        "MAILTO=ops@example.com\n*/5 * * * * /usr/bin/foo\n",
    )
    .unwrap();

    let mgr = TableManager::new(Arc::new(fx.cli()));
    let mut entries = mgr.fetch().await.unwrap().entries;
    assert_eq!(entries.len(), 1);

    entries[0].enabled = false;
    let confirmed = mgr
        .save(&cronpad_table::SaveRequest::new(entries))
        .await
        .unwrap();

    assert_eq!(
        fx.table().as_deref(),
        Some("# */5 * * * * /usr/bin/foo\nMAILTO=ops@example.com\n")
    );
    assert!(!confirmed.entries[0].enabled);
    assert!(fx.leftovers().is_empty());
}
