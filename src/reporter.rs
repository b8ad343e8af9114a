//! Reporting collaborator for passport generation.
//!
//! The generator never logs through a global directly. It reports the two
//! events downstream observers care about through [`PassportReporter`]:
//! an own-time failure that was downgraded to a missing field, and a
//! successfully written passport.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::UnitError;

/// Shared reporter handle, resolved from the application context.
pub type Reporter = Arc<dyn PassportReporter>;

/// Receives generation outcomes.
pub trait PassportReporter: Send + Sync {
    /// A unit's own assembly time could not be read; the field was omitted.
    fn report_error(&self, uuid: &str, error: &UnitError);

    /// A passport was written for the unit.
    fn report_saved(&self, uuid: &str, path: &Path);
}

/// Forwards reports to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl PassportReporter for TracingReporter {
    fn report_error(&self, uuid: &str, error: &UnitError) {
        tracing::error!(uuid, error = %error, "Failed to compute unit assembly time");
    }

    fn report_saved(&self, uuid: &str, path: &Path) {
        tracing::info!(
            uuid,
            outcome = "success",
            path = %path.display(),
            "Unit passport with UUID {} has been dumped successfully",
            uuid
        );
    }
}

/// A single reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Error { uuid: String, message: String },
    Saved { uuid: String, path: PathBuf },
}

/// Keeps reported events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    /// Uuids of units whose own time failed, in report order.
    pub fn failed_units(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Error { uuid, .. } => Some(uuid.clone()),
                ReportEvent::Saved { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEvent>> {
        // A poisoned log is still a valid log
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: ReportEvent) {
        self.lock().push(event);
    }
}

impl PassportReporter for MemoryReporter {
    fn report_error(&self, uuid: &str, error: &UnitError) {
        self.push(ReportEvent::Error {
            uuid: uuid.to_string(),
            message: error.to_string(),
        });
    }

    fn report_saved(&self, uuid: &str, path: &Path) {
        self.push(ReportEvent::Saved {
            uuid: uuid.to_string(),
            path: path.to_path_buf(),
        });
    }
}
