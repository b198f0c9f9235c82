//! Static site build.
//!
//! [`SiteBuilder::build`] renders every document in parallel and writes:
//!
//! ```text
//! dist/
//!   index.html                 home page
//!   <route>/index.html         one per document
//!   pages/<route>.json         frontmatter, tree and toc per document
//!   navigation.json
//!   search.json
//!   highlight.css
//!   llms.txt
//!   llms-full.txt
//! ```
//!
//! The [`Highlighter`] is shared by all worker threads; its grammars load
//! once, on first use.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use apidocs_config::{Config, NavigationConfig, SiteConfig};
use apidocs_markup::Frontmatter;
use apidocs_renderer::{
    HighlightConfig, HighlightError, Highlighter, RenderNode, TocEntry, TransformError,
    Transformer, escape_html, render_html,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::content::{ContentDir, ContentError, Document, DocumentInfo};
use crate::export::{llms_full, llms_index};
use crate::navigation::{NavSection, build_navigation};
use crate::search::{SearchItem, build_search_index};
use crate::slug::Slug;

/// Error aborting a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),
    /// Tag validation failed in a document.
    #[error("{}: {source}", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },
    /// A scanned document vanished before it could be loaded.
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Highlight(#[from] HighlightError),
    /// An artifact could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Transformed page, as written to `pages/<route>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    #[serde(skip)]
    pub slug: Slug,
    pub frontmatter: Frontmatter,
    pub tree: RenderNode,
    pub toc: Vec<TocEntry>,
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Page {
    #[must_use]
    pub fn title(&self) -> &str {
        self.frontmatter.title.as_deref().unwrap_or_default()
    }
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of pages written.
    pub pages: usize,
    /// Non-fatal transform warnings, prefixed with the page route.
    pub warnings: Vec<String>,
    /// Wall time of the whole build.
    pub elapsed: Duration,
}

/// Builds the site artifacts from a content directory.
pub struct SiteBuilder {
    content: ContentDir,
    site: SiteConfig,
    navigation: NavigationConfig,
    highlighter: Highlighter,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let highlighter = Highlighter::new(HighlightConfig {
            light_theme: config.highlight.light_theme.clone(),
            dark_theme: config.highlight.dark_theme.clone(),
        });
        Self {
            content: ContentDir::new(&config.content_resolved.source_dir),
            site: config.site.clone(),
            navigation: config.navigation.clone(),
            highlighter,
        }
    }

    #[must_use]
    pub fn content(&self) -> &ContentDir {
        &self.content
    }

    #[must_use]
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Navigation tree over every document.
    pub fn navigation(&self) -> Result<Vec<NavSection>, BuildError> {
        Ok(build_navigation(&self.content.scan()?, &self.navigation))
    }

    /// Search index over every document.
    pub fn search_index(&self) -> Result<Vec<SearchItem>, BuildError> {
        Ok(build_search_index(&self.content.scan()?))
    }

    /// Load and transform one document. `Ok(None)` if the slug has no file.
    pub fn render_page(&self, slug: &Slug) -> Result<Option<Page>, BuildError> {
        let Some(document) = self.content.load(slug)? else {
            return Ok(None);
        };
        self.transform(&document).map(Some)
    }

    fn transform(&self, document: &Document) -> Result<Page, BuildError> {
        let transformed = Transformer::new(&self.highlighter)
            .transform(&document.body)
            .map_err(|source| BuildError::Transform {
                path: document.path.clone(),
                source,
            })?;

        for warning in &transformed.warnings {
            tracing::warn!(page = %document.slug, "{warning}");
        }

        Ok(Page {
            slug: document.slug.clone(),
            frontmatter: document.frontmatter.clone(),
            tree: transformed.tree,
            toc: transformed.toc,
            warnings: transformed.warnings,
        })
    }

    /// Render every document and write all artifacts to `output_dir`.
    ///
    /// Any malformed document aborts the build.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        tracing::info!(
            source = %self.content.root().display(),
            output = %output_dir.display(),
            "Building site"
        );

        let infos = self.content.scan()?;
        let rendered: Vec<(Document, Page)> = infos
            .par_iter()
            .map(|info| self.build_page(info, output_dir))
            .collect::<Result<_, _>>()?;

        let (documents, pages): (Vec<Document>, Vec<Page>) = rendered.into_iter().unzip();

        write_json(output_dir, "navigation.json", &build_navigation(&infos, &self.navigation))?;
        write_json(output_dir, "search.json", &build_search_index(&infos))?;
        write_file(&output_dir.join("highlight.css"), &self.highlighter.theme_css()?)?;
        write_file(
            &output_dir.join("llms.txt"),
            &llms_index(&documents, &self.site, &self.navigation),
        )?;
        write_file(
            &output_dir.join("llms-full.txt"),
            &llms_full(&documents, &self.site, &self.navigation),
        )?;

        let warnings: Vec<String> = pages
            .iter()
            .flat_map(|page| {
                let route = page.slug.route();
                page.warnings.iter().map(move |w| format!("{route}: {w}"))
            })
            .collect();

        let elapsed = start.elapsed();
        tracing::info!(
            pages = pages.len(),
            warnings = warnings.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Site built"
        );
        Ok(BuildReport {
            pages: pages.len(),
            warnings,
            elapsed,
        })
    }

    fn build_page(&self, info: &DocumentInfo, output_dir: &Path) -> Result<(Document, Page), BuildError> {
        let document = self
            .content
            .load(&info.slug)?
            .ok_or_else(|| BuildError::NotFound(info.slug.route()))?;
        let page = self.transform(&document)?;
        tracing::debug!(page = %info.slug, toc = page.toc.len(), "Rendered page");

        write_json(output_dir, &page_json_path(&info.slug), &page)?;
        write_file(
            &output_dir.join(page_html_path(&info.slug)),
            &page_html(&page, &self.site),
        )?;
        Ok((document, page))
    }
}

/// `pages/index.json` for the home page, `pages/a/b.json` otherwise.
fn page_json_path(slug: &Slug) -> String {
    if slug.is_root() {
        "pages/index.json".to_owned()
    } else {
        format!("pages/{}.json", slug.segments().join("/"))
    }
}

fn page_html_path(slug: &Slug) -> PathBuf {
    slug.segments()
        .iter()
        .fold(PathBuf::new(), |path, segment| path.join(segment))
        .join("index.html")
}

/// Minimal HTML document around the rendered article.
fn page_html(page: &Page, site: &SiteConfig) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "<title>{} | {}</title>",
        escape_html(page.title()),
        escape_html(&site.title)
    );
    if let Some(description) = &page.frontmatter.description {
        let _ = writeln!(html, r#"<meta name="description" content="{}">"#, escape_html(description));
    }
    html.push_str("<link rel=\"stylesheet\" href=\"/highlight.css\">\n</head>\n<body>\n");

    if let (Some(method), Some(endpoint)) = (page.frontmatter.method, &page.frontmatter.endpoint) {
        let _ = writeln!(
            html,
            r#"<div class="endpoint-bar"><span class="method method-{}">{method}</span><code>{}</code></div>"#,
            method.as_str().to_ascii_lowercase(),
            escape_html(endpoint)
        );
    }
    html.push_str(&render_html(&page.tree));
    html.push_str("\n</body>\n</html>\n");
    html
}

fn write_json<T: Serialize + ?Sized>(output_dir: &Path, name: &str, value: &T) -> Result<(), BuildError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| BuildError::Json {
        name: name.to_owned(),
        source,
    })?;
    write_file(&output_dir.join(name), &json)
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    let io_error = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths() {
        assert_eq!(page_json_path(&Slug::root()), "pages/index.json");
        assert_eq!(page_json_path(&Slug::from_route("/a/b")), "pages/a/b.json");
        assert_eq!(page_html_path(&Slug::root()), PathBuf::from("index.html"));
        assert_eq!(page_html_path(&Slug::from_route("/a/b")), PathBuf::from("a/b/index.html"));
    }

    #[test]
    fn test_page_html_endpoint_bar() {
        let page = Page {
            slug: Slug::from_route("/api-reference/invoices/create"),
            frontmatter: Frontmatter {
                title: Some("Create <Invoice>".to_owned()),
                method: Some(apidocs_markup::HttpMethod::Post),
                endpoint: Some("/invoices".to_owned()),
                ..Frontmatter::default()
            },
            tree: RenderNode::Text("Body".to_owned()),
            toc: Vec::new(),
            warnings: Vec::new(),
        };
        let html = page_html(&page, &SiteConfig::default());

        assert!(html.contains("<title>Create &lt;Invoice&gt; | API Documentation</title>"));
        assert!(html.contains(
            r#"<div class="endpoint-bar"><span class="method method-post">POST</span><code>/invoices</code></div>"#
        ));
        assert!(html.contains("Body"));
        assert!(!html.contains("name=\"description\""));
    }
}
