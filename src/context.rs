//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::reporter::{Reporter, TracingReporter};

/// Root application context for dependency injection.
///
/// The Context holds all shared dependencies and uses `#[derive(Context)]`
/// to generate `FromRef` implementations for each field, so services such as
/// [`PassportService`](crate::services::PassportService) can be resolved from
/// it at compile time.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Receiver of generation outcomes.
    pub reporter: Reporter,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(config: Config, reporter: Reporter) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
        }
    }

    /// Creates a context that reports through `tracing`.
    pub fn with_tracing(config: Config) -> Self {
        Self::new(config, Arc::new(TracingReporter))
    }
}
