//! `apidocs nav` command implementation.

use apidocs_config::CliSettings;
use apidocs_site::SiteBuilder;
use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    content: ContentArgs,
}

impl NavArgs {
    /// Print the navigation tree as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the content cannot be scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.content.load(CliSettings::default())?;
        let nav = SiteBuilder::new(&config).navigation()?;
        Output::new().print(&serde_json::to_string_pretty(&nav)?);
        Ok(())
    }
}
