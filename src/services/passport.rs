//! Passport service: the generation entry point.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{Unit, UnitPassport};
use crate::reporter::Reporter;
use crate::services::{DocumentBuilder, PassportWriter};

/// Builds passports for unit trees and writes them to disk.
#[derive(FromContext, Clone)]
pub struct PassportService {
    config: Arc<Config>,
    reporter: Reporter,
}

impl PassportService {
    /// Builds the passport document without writing it.
    pub fn build(&self, unit: &Unit) -> Result<UnitPassport, AppError> {
        let builder = DocumentBuilder::new(&self.config.passport, self.reporter.as_ref());
        Ok(builder.build(unit)?)
    }

    /// Constructs the unit's passport, writes it and returns its path.
    ///
    /// Failures to aggregate component times and I/O failures are returned;
    /// a unit's unreadable own time only drops that field.
    pub async fn construct(&self, unit: &Unit) -> Result<PathBuf, AppError> {
        tracing::debug!(uuid = %unit.uuid, "Constructing unit passport");

        let document = self.build(unit).inspect_err(|e| {
            tracing::error!(uuid = %unit.uuid, error = %e, "Passport construction failed");
        })?;

        PassportWriter::new(&self.config.passport, self.reporter.as_ref())
            .write(unit, &document)
            .await
    }
}
