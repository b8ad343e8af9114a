//! CLI module for Unit Passport.
//!
//! Subcommands:
//! - `generate`: Write the passport for a unit tree read from a file
//! - `preview`: Print the passport YAML without writing it

mod generate;
mod preview;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::AppError;
use crate::models::Unit;

/// Unit Passport - production history documents for assembled units
#[derive(Parser)]
#[command(name = "unit-passport")]
#[command(about = "Generate archival YAML passports for assembled units")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate and write the passport for a unit tree
    Generate {
        /// Unit tree file (JSON, or YAML for .yaml/.yml)
        input: PathBuf,
    },

    /// Print the passport for a unit tree to stdout
    Preview {
        /// Unit tree file (JSON, or YAML for .yaml/.yml)
        input: PathBuf,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Generate { ref input } => self.run_generate(input).await,
            Command::Preview { ref input } => self.run_preview(input).await,
        }
    }
}

/// Reads a unit tree from a JSON or YAML file.
pub async fn load_unit(path: &Path) -> Result<Unit, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path, e))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );

    let parsed: Result<Unit, String> = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| AppError::Input {
        path: path.to_path_buf(),
        message,
    })
}
