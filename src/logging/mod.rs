//! Diagnostic tracing and the submission log.
//!
//! Diagnostics go through `tracing` to a daily rolling file, since stdout
//! belongs to the terminal UI. Separately, every form submission can be
//! appended to `submissions_<date>.log` in the same directory so entries
//! survive a server outage.

use crate::config::{expand_home, LoggingConfig};
use crate::form::{FormPayload, SubmitError};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Returns the guard that flushes the file
/// writer on drop, or `None` when logging is disabled.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    if !config.enabled {
        return None;
    }

    let dir = expand_home(&config.log_dir);
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log directory {}: {}", dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::daily(&dir, "scoutdeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        return None;
    }
    Some(guard)
}

/// One line of the submission log.
pub fn format_line(time: &str, payload: &FormPayload, outcome: &Result<(), SubmitError>) -> String {
    match outcome {
        Ok(()) => format!("[{}] OK {}", time, payload.encode()),
        Err(e) => format!("[{}] FAILED ({}) {}", time, e, payload.encode()),
    }
}

/// Appends submitted payloads and their outcome to daily files.
pub struct SubmissionLog {
    enabled: bool,
    log_dir: PathBuf,
    file_handles: HashMap<String, File>,
}

impl SubmissionLog {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled && config.log_submissions,
            log_dir: expand_home(&config.log_dir),
            file_handles: HashMap::new(),
        }
    }

    pub fn record(&mut self, payload: &FormPayload, outcome: &Result<(), SubmitError>) {
        if !self.enabled {
            return;
        }

        let now = chrono::Local::now();
        let line = format_line(&now.format("%H:%M:%S").to_string(), payload, outcome);
        let filename = format!("submissions_{}.log", now.format("%Y-%m-%d"));

        if !self.file_handles.contains_key(&filename) {
            let path = self.log_dir.join(&filename);
            let opened = fs::create_dir_all(&self.log_dir)
                .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
            match opened {
                Ok(file) => {
                    self.file_handles.insert(filename.clone(), file);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot open submission log");
                    return;
                }
            }
        }

        if let Some(handle) = self.file_handles.get_mut(&filename) {
            if let Err(e) = writeln!(handle, "{}", line) {
                warn!(error = %e, "failed to write submission log");
            }
        }
    }
}
