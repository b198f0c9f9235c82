//! apidocs CLI - static API documentation builder.
//!
//! Provides commands for:
//! - `build`: Render every page and write the site artifacts
//! - `search`: Query the search index
//! - `nav`: Print the navigation tree
//! - `page`: Print one transformed page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, NavArgs, PageArgs, SearchArgs};
use output::Output;

/// apidocs - static API documentation builder.
#[derive(Parser)]
#[command(name = "apidocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site.
    Build(BuildArgs),
    /// Search pages by title, description or route.
    Search(SearchArgs),
    /// Print the navigation tree as JSON.
    Nav(NavArgs),
    /// Print a transformed page as JSON.
    Page(PageArgs),
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Search(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Page(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["apidocs", "build", "-o", "public", "-s", "docs", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Build(ref args) if args.verbose));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
        assert_eq!(log_filter(false, Some("debug")).to_string(), "debug");
        assert_eq!(log_filter(true, Some("debug")).to_string(), "info");
    }

    #[test]
    fn test_page_requires_slug() {
        assert!(Cli::try_parse_from(["apidocs", "page"]).is_err());
        assert!(Cli::try_parse_from(["apidocs", "page", "/concepts/auth"]).is_ok());
    }
}
