//! Generate command handler.

use std::path::Path;

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::services::PassportService;

use super::{load_unit, App};

impl App {
    /// Run the generate command: read a unit tree and write its passport.
    pub async fn run_generate(&self, input: &Path) -> Result<()> {
        let config = Config::load()?;
        tracing::info!(
            "Writing passports to {}",
            config.passport.directory.display()
        );

        let unit = load_unit(input).await?;
        tracing::info!(
            "Loaded unit {} ({}) with {} component(s)",
            unit.uuid,
            unit.model_name,
            unit.components_units.len()
        );

        let ctx = Context::with_tracing(config);
        let service = PassportService::from_ref(&ctx);
        let path = service.construct(&unit).await?;

        println!("{}", path.display());
        Ok(())
    }
}
