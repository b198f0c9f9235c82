//! Content loading, site indexes and static build for apidocs.
//!
//! This crate provides:
//! - [`ContentDir`]: slug to file lookup, document loading and scanning
//! - [`build_navigation`] and [`build_search_index`]: site-wide indexes
//!   built from frontmatter alone
//! - [`llms_index`] and [`llms_full`]: plain-text exports
//! - [`SiteBuilder`]: parallel build writing every artifact to disk
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use apidocs_config::Config;
//! use apidocs_site::{SiteBuilder, Slug};
//!
//! let config = Config::load(None, None)?;
//! let builder = SiteBuilder::new(&config);
//!
//! // Render a single page
//! let page = builder.render_page(&Slug::from_route("/getting-started/authentication"))?;
//!
//! // Build everything
//! let report = builder.build(Path::new("dist"))?;
//! println!("{} pages", report.pages);
//! # Ok(())
//! # }
//! ```

mod build;
mod content;
mod export;
mod navigation;
mod search;
mod sections;
mod slug;

pub use build::{BuildError, BuildReport, Page, SiteBuilder};
pub use content::{ContentDir, ContentError, Document, DocumentInfo};
pub use export::{llms_full, llms_index, strip_tags};
pub use navigation::{NavSection, build_navigation};
pub use search::{MAX_RESULTS, SearchItem, build_search_index, search};
pub use slug::Slug;
