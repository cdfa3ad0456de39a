use std::sync::Mutex;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};

/// Synchronous reporting surface threaded through the pipeline components.
///
/// Replaces ad-hoc printing so the same core drives an interactive terminal,
/// a quiet batch run, or a test harness. Transfer callbacks have no-op
/// defaults; sinks that only care about lines can skip them.
pub trait ProgressSink: Send + Sync {
    /// Informational line for the user.
    fn note(&self, message: &str);

    /// Non-fatal problem worth surfacing.
    fn warn(&self, message: &str);

    /// A file transfer is starting. `total_bytes` is absent when the server
    /// does not announce a content length.
    fn transfer_started(&self, name: &str, total_bytes: Option<u64>) {
        let _ = (name, total_bytes);
    }

    /// Cumulative bytes written for the transfer in flight.
    fn transfer_progress(&self, bytes: u64) {
        let _ = bytes;
    }

    /// The transfer in flight ended, successfully or not.
    fn transfer_finished(&self) {}
}

/// Terminal sink: styled lines plus a byte-progress bar per transfer.
pub struct ConsoleSink {
    term: Term,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            bar: Mutex::new(None),
        }
    }

    fn write_line(&self, line: &str) {
        // Route through the active bar so it does not get clobbered.
        let bar = self.bar.lock().unwrap();
        match bar.as_ref() {
            Some(bar) => bar.println(line),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleSink {
    fn note(&self, message: &str) {
        self.write_line(message);
    }

    fn warn(&self, message: &str) {
        self.write_line(&format!("{} {}", style("⚠️").yellow(), message));
    }

    fn transfer_started(&self, name: &str, total_bytes: Option<u64>) {
        let bar = match total_bytes {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.blue} {bytes} {msg}")
                        .unwrap(),
                );
                bar
            }
        };
        bar.set_message(name.to_string());

        let mut slot = self.bar.lock().unwrap();
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        *slot = Some(bar);
    }

    fn transfer_progress(&self, bytes: u64) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.set_position(bytes);
        }
    }

    fn transfer_finished(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

/// Sink that drops everything. Used by tests and quiet callers.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn note(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}
