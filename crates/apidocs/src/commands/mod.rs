//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod nav;
pub(crate) mod page;
pub(crate) mod search;

use std::path::PathBuf;

use apidocs_config::{CliSettings, Config};
use clap::Args;

pub(crate) use build::BuildArgs;
pub(crate) use nav::NavArgs;
pub(crate) use page::PageArgs;
pub(crate) use search::SearchArgs;

use crate::error::CliError;

/// Options shared by every command that reads content.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover apidocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ContentArgs {
    /// Load the configuration with these overrides applied.
    pub(crate) fn load(self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir,
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}
