//! `CrontabCli`: the production backend, driving the `crontab` binary.
//!
//! Listing runs `<program> [args..] [-u user] -l`; replacing writes the new
//! table to a transient file and runs `<program> [args..] [-u user] <file>`.
//! Every invocation is bounded by a timeout and the child is killed when the
//! deadline passes.

use async_trait::async_trait;
use cronpad_core::config::StoreConfig;
use std::{
    ffi::OsStr,
    io::Write,
    path::PathBuf,
    process::{ExitStatus, Output, Stdio},
    time::Duration,
};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{
    backend::BackingStore,
    error::{Result, StoreError},
};

/// Backing store reached through the `crontab` command-line tool.
#[derive(Debug, Clone)]
pub struct CrontabCli {
    program: String,
    args: Vec<String>,
    user: Option<String>,
    timeout: Duration,
    empty_marker: String,
    temp_dir: Option<PathBuf>,
}

impl CrontabCli {
    /// Backend for `program` with default timeout and empty-table marker.
    pub fn new(program: impl Into<String>) -> Self {
        Self::from_config(&StoreConfig {
            program: program.into(),
            ..StoreConfig::default()
        })
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            user: config.user.clone(),
            timeout: Duration::from_secs(config.effective_timeout_secs()),
            empty_marker: config.empty_marker.clone(),
            temp_dir: config.temp_dir.as_ref().map(PathBuf::from),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Run the store program with `extra` appended to the fixed arguments.
    async fn run(&self, extra: &OsStr) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(user) = &self.user {
            cmd.arg("-u").arg(user);
        }
        cmd.arg(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must take the child with it.
            .kill_on_drop(true);

        debug!(program = %self.program, arg = ?extra, "invoking store program");

        let child = cmd.spawn().map_err(|source| StoreError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_elapsed) => {
                let ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(program = %self.program, ms, "store program timed out; killed");
                Err(StoreError::Timeout { ms })
            }
        }
    }

    fn write_transient(&self, text: &str) -> Result<tempfile::TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cronpad-").suffix(".crontab");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(StoreError::TempFile)?;

        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(StoreError::TempFile)?;

        // Closes the handle; the file itself lives until the path is dropped.
        Ok(file.into_temp_path())
    }
}

#[async_trait]
impl BackingStore for CrontabCli {
    fn name(&self) -> &str {
        "crontab"
    }

    async fn read(&self) -> Result<String> {
        let output = self.run(OsStr::new("-l")).await?;
        if output.status.success() {
            return String::from_utf8(output.stdout).map_err(|e| StoreError::Encoding {
                offset: e.utf8_error().valid_up_to(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(&self.empty_marker) {
            debug!("store has no table yet; treating as empty");
            return Ok(String::new());
        }

        Err(StoreError::ListFailed {
            status: describe(output.status),
            output: stderr.trim().to_string(),
        })
    }

    async fn replace(&self, text: &str) -> Result<()> {
        let path = self.write_transient(text)?;
        let result = self.run(path.as_os_str()).await;

        let shown = path.display().to_string();
        if let Err(e) = path.close() {
            warn!(path = %shown, error = %e, "failed to remove transient table file");
        }

        let output = result?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(StoreError::InstallFailed {
                status: describe(output.status),
                output: combined.trim().to_string(),
            });
        }

        info!(bytes = text.len(), "table replaced");
        Ok(())
    }
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
