//! `apidocs search` command implementation.

use apidocs_config::CliSettings;
use apidocs_site::{SearchItem, SiteBuilder, search};
use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Text to look for in titles, descriptions and routes.
    query: String,

    #[command(flatten)]
    content: ContentArgs,
}

impl SearchArgs {
    /// Execute the search command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the content cannot be scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.content.load(CliSettings::default())?;
        let items = SiteBuilder::new(&config).search_index()?;

        let results = search(&items, &self.query);
        if results.is_empty() {
            output.warning(&format!("No results for \"{}\"", self.query));
            return Ok(());
        }

        for item in results {
            output.print(&result_line(item));
        }
        Ok(())
    }
}

/// One result per line: padded method, title, route, description.
fn result_line(item: &SearchItem) -> String {
    let method = item
        .method
        .map_or_else(String::new, |m| format!("{:<7}", m.as_str()));
    match &item.description {
        Some(description) => format!("{method}{}  {}  {description}", item.title, item.href),
        None => format!("{method}{}  {}", item.title, item.href),
    }
}
