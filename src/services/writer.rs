//! Serializes passports to YAML and persists them.

use std::path::PathBuf;

use crate::config::PassportConfig;
use crate::error::AppError;
use crate::models::{Unit, UnitPassport};
use crate::reporter::PassportReporter;
use crate::services::yaml;

/// Renders a passport as YAML.
///
/// Keys keep their construction order and non-ASCII text is emitted as is.
/// Values YAML 1.1 readers would resolve to numbers or booleans, such as
/// assembly times past one hour, are quoted.
pub fn render(document: &UnitPassport) -> Result<String, AppError> {
    Ok(yaml::to_string(document)?)
}

/// Writes passports under the configured directory.
///
/// Files are named after the unit uuid, so writing the same unit again
/// replaces the previous passport. The write is not staged: an interrupted
/// call can leave a partial file behind until the next write.
pub struct PassportWriter<'a> {
    config: &'a PassportConfig,
    reporter: &'a dyn PassportReporter,
}

impl<'a> PassportWriter<'a> {
    pub fn new(config: &'a PassportConfig, reporter: &'a dyn PassportReporter) -> Self {
        Self { config, reporter }
    }

    /// Writes `document` for `unit` and returns the file path.
    pub async fn write(&self, unit: &Unit, document: &UnitPassport) -> Result<PathBuf, AppError> {
        let path = self.config.passport_path(&unit.uuid)?;
        let contents = render(document)?;

        let dir = &self.config.directory;
        if !tokio::fs::metadata(dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            tracing::debug!(dir = %dir.display(), "Creating passport directory");
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::io(dir, e))?;
        }

        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| AppError::io(&path, e))?;

        self.reporter.report_saved(&unit.uuid, &path);
        Ok(path)
    }
}
