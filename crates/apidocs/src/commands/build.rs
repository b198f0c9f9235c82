//! `apidocs build` command implementation.

use std::path::PathBuf;

use apidocs_config::CliSettings;
use apidocs_site::SiteBuilder;
use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Canonical site URL used in the plain-text exports (overrides config).
    #[arg(long, env = "APIDOCS_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose output (build progress and timing).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any document is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.content.load(CliSettings {
            source_dir: None,
            output_dir: self.output_dir,
            base_url: self.base_url,
        })?;
        let output_dir = &config.content_resolved.output_dir;

        output.highlight(&format!("Building {}", config.site.title));
        output.info(&format!(
            "Source directory: {}",
            config.content_resolved.source_dir.display()
        ));
        output.info(&format!("Output directory: {}", output_dir.display()));
        match &config.config_path {
            Some(path) => output.info(&format!("Config: {}", path.display())),
            None => output.info("Config: defaults (no apidocs.toml found)"),
        }

        let report = SiteBuilder::new(&config).build(output_dir)?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.success(&format!("Built {} pages in {:.2?}", report.pages, report.elapsed));
        Ok(())
    }
}
