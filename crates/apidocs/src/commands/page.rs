//! `apidocs page` command implementation.

use apidocs_config::CliSettings;
use apidocs_site::{SiteBuilder, Slug};
use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Page route, e.g. `/api-reference/invoices/create` or `/` for home.
    slug: String,

    #[command(flatten)]
    content: ContentArgs,
}

impl PageArgs {
    /// Print the transformed page as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotFound`] when no file matches the slug, or an
    /// error if the document is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load(CliSettings::default())?;
        let slug = Slug::from_route(&self.slug);

        let page = SiteBuilder::new(&config)
            .render_page(&slug)?
            .ok_or_else(|| CliError::NotFound(slug.route()))?;

        for warning in &page.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.print(&serde_json::to_string_pretty(&page)?);
        Ok(())
    }
}
