//! Preview command handler.

use std::path::Path;

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::services::{render, PassportService};

use super::{load_unit, App};

impl App {
    /// Run the preview command: print the passport without writing it.
    pub async fn run_preview(&self, input: &Path) -> Result<()> {
        let config = Config::load()?;
        let unit = load_unit(input).await?;

        let ctx = Context::with_tracing(config);
        let document = PassportService::from_ref(&ctx).build(&unit)?;

        print!("{}", render(&document)?);
        Ok(())
    }
}
