//! Content directory access.
//!
//! Maps slugs to markdown files and back:
//!
//! | slug                           | file                                   |
//! |--------------------------------|----------------------------------------|
//! | (root)                         | `index.md`                             |
//! | `concepts/auth`                | `concepts/auth.md`, else `concepts/auth/index.md` |
//!
//! Hidden files and directories are ignored by [`ContentDir::scan`].

use std::fs;
use std::path::{Path, PathBuf};

use apidocs_markup::{
    Frontmatter, HttpMethod, Markup, MarkupError, parse, split_frontmatter, title_case,
};

use crate::slug::Slug;

const INDEX_FILE: &str = "index.md";
const EXTENSION: &str = ".md";

/// Error reading or parsing a content file.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// File or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Frontmatter or markup is malformed.
    #[error("{}: {source}", path.display())]
    Markup {
        path: PathBuf,
        #[source]
        source: MarkupError,
    },
}

/// A fully loaded document.
#[derive(Debug, Clone)]
pub struct Document {
    pub slug: Slug,
    /// Metadata; `title` is always set.
    pub frontmatter: Frontmatter,
    /// Parsed body.
    pub body: Markup,
    /// Raw body text after the frontmatter.
    pub source: String,
    /// Source file.
    pub path: PathBuf,
}

impl Document {
    #[must_use]
    pub fn title(&self) -> &str {
        self.frontmatter.title.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.frontmatter.description.as_deref()
    }
}

/// Frontmatter-only view of a document, produced by [`ContentDir::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub slug: Slug,
    pub title: String,
    pub description: Option<String>,
    pub method: Option<HttpMethod>,
    pub endpoint: Option<String>,
    pub path: PathBuf,
}

/// Root directory of the markdown sources.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the source file of `slug`.
    ///
    /// Tries `<slug>.md` first, then `<slug>/index.md`. Segments that would
    /// escape the content root never resolve.
    #[must_use]
    pub fn resolve(&self, slug: &Slug) -> Option<PathBuf> {
        if slug.is_root() {
            let index = self.root.join(INDEX_FILE);
            return index.is_file().then_some(index);
        }
        if slug.segments().iter().any(|s| !is_plain_segment(s)) {
            return None;
        }

        let dir = slug
            .segments()
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let mut direct = dir.clone().into_os_string();
        direct.push(EXTENSION);
        let direct = PathBuf::from(direct);
        if direct.is_file() {
            return Some(direct);
        }

        let index = dir.join(INDEX_FILE);
        index.is_file().then_some(index)
    }

    /// Load and parse the document at `slug`.
    ///
    /// Returns `Ok(None)` when no file matches; malformed content is an error.
    pub fn load(&self, slug: &Slug) -> Result<Option<Document>, ContentError> {
        let Some(path) = self.resolve(slug) else {
            return Ok(None);
        };
        tracing::debug!(slug = %slug, path = %path.display(), "Loading document");

        let raw = read(&path)?;
        let (header, body) = split_frontmatter(&raw).map_err(|e| markup_error(&path, e))?;
        let mut frontmatter =
            Frontmatter::from_yaml(header.unwrap_or_default()).map_err(|e| markup_error(&path, e))?;
        let header_lines = raw[..raw.len() - body.len()].matches('\n').count();
        let tree = parse(body).map_err(|e| markup_error(&path, e.offset_lines(header_lines)))?;

        if frontmatter.title.is_none() {
            frontmatter.title = Some(fallback_title(slug));
        }

        Ok(Some(Document {
            slug: slug.clone(),
            frontmatter,
            body: tree,
            source: body.to_owned(),
            path,
        }))
    }

    /// Collect the frontmatter of every document below the root.
    ///
    /// Entries are visited in name order. When both `a.md` and
    /// `a/index.md` exist, only the file [`resolve`](Self::resolve) picks is
    /// reported.
    pub fn scan(&self) -> Result<Vec<DocumentInfo>, ContentError> {
        let mut infos = Vec::new();
        self.scan_directory(&self.root, &[], &mut infos)?;

        infos.retain(|info| {
            let wins = self.resolve(&info.slug).as_deref() == Some(info.path.as_path());
            if !wins {
                tracing::warn!(
                    slug = %info.slug,
                    path = %info.path.display(),
                    "Ignoring file shadowed by another file with the same slug"
                );
            }
            wins
        });
        Ok(infos)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        base: &[String],
        infos: &mut Vec<DocumentInfo>,
    ) -> Result<(), ContentError> {
        let io_error = |source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = fs::read_dir(dir)
            .map_err(io_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            if path.is_dir() {
                let mut child = base.to_vec();
                child.push(name);
                self.scan_directory(&path, &child, infos)?;
            } else if let Some(stem) = name.strip_suffix(EXTENSION) {
                let slug = if name == INDEX_FILE {
                    Slug::new(base.to_vec())
                } else {
                    base.iter().map(String::as_str).chain([stem]).collect()
                };
                infos.push(read_info(slug, path)?);
            }
        }
        Ok(())
    }
}

fn read_info(slug: Slug, path: PathBuf) -> Result<DocumentInfo, ContentError> {
    let raw = read(&path)?;
    let (header, _) = split_frontmatter(&raw).map_err(|e| markup_error(&path, e))?;
    let frontmatter =
        Frontmatter::from_yaml(header.unwrap_or_default()).map_err(|e| markup_error(&path, e))?;

    Ok(DocumentInfo {
        title: frontmatter.title.unwrap_or_else(|| fallback_title(&slug)),
        description: frontmatter.description,
        method: frontmatter.method,
        endpoint: frontmatter.endpoint,
        slug,
        path,
    })
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn markup_error(path: &Path, source: MarkupError) -> ContentError {
    ContentError::Markup {
        path: path.to_path_buf(),
        source,
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

/// Title used when the frontmatter has none.
fn fallback_title(slug: &Slug) -> String {
    slug.last().map_or_else(|| "Home".to_owned(), title_case)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn routes(infos: &[DocumentInfo]) -> Vec<String> {
        infos.iter().map(|i| i.slug.route()).collect()
    }

    #[test]
    fn test_resolve_root() {
        let temp = TempDir::new().unwrap();
        let content = ContentDir::new(temp.path());
        assert_eq!(content.resolve(&Slug::root()), None);

        write(temp.path(), "index.md", "# Home\n");
        assert_eq!(
            content.resolve(&Slug::root()),
            Some(temp.path().join("index.md"))
        );
    }

    #[test]
    fn test_resolve_prefers_direct_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "concepts/auth.md", "");
        write(temp.path(), "concepts/auth/index.md", "");
        write(temp.path(), "objects/index.md", "");
        let content = ContentDir::new(temp.path());

        assert_eq!(
            content.resolve(&Slug::from_route("/concepts/auth")),
            Some(temp.path().join("concepts/auth.md"))
        );
        assert_eq!(
            content.resolve(&Slug::from_route("/objects")),
            Some(temp.path().join("objects/index.md"))
        );
        assert_eq!(content.resolve(&Slug::from_route("/missing")), None);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/page.md", "");
        let content = ContentDir::new(temp.path().join("docs"));
        assert_eq!(content.resolve(&Slug::new(vec!["..".to_owned(), "docs".to_owned()])), None);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let content = ContentDir::new(temp.path());
        assert!(content.load(&Slug::from_route("/nope")).unwrap().is_none());
    }

    #[test]
    fn test_load_document() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "api-reference/invoices/create.md",
            "---\ntitle: Create Invoice\nmethod: POST\nendpoint: /invoices\n---\n## Request\n",
        );
        let content = ContentDir::new(temp.path());

        let doc = content
            .load(&Slug::from_route("/api-reference/invoices/create"))
            .unwrap()
            .unwrap();
        assert_eq!(doc.title(), "Create Invoice");
        assert_eq!(doc.frontmatter.method, Some(HttpMethod::Post));
        assert_eq!(doc.frontmatter.endpoint.as_deref(), Some("/invoices"));
        assert_eq!(doc.source, "## Request\n");
        assert_eq!(doc.body.text(), "Request");
    }

    #[test]
    fn test_load_title_fallback() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.md", "Welcome\n");
        write(temp.path(), "getting-started/quick-start.md", "---\ndescription: Fast\n---\nGo\n");
        let content = ContentDir::new(temp.path());

        let home = content.load(&Slug::root()).unwrap().unwrap();
        assert_eq!(home.title(), "Home");
        let page = content
            .load(&Slug::from_route("/getting-started/quick-start"))
            .unwrap()
            .unwrap();
        assert_eq!(page.title(), "Quick Start");
        assert_eq!(page.description(), Some("Fast"));
    }

    #[test]
    fn test_load_malformed_markup_is_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "broken.md", "{% callout %}\nNever closed\n");
        let content = ContentDir::new(temp.path());

        let err = content.load(&Slug::from_route("/broken")).unwrap_err();
        assert!(matches!(err, ContentError::Markup { ref path, .. } if path.ends_with("broken.md")));
    }

    #[test]
    fn test_markup_error_lines_count_from_file_start() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "stray.md",
            "---\ntitle: Stray\ndescription: Close without open\nmethod: GET\n---\nIntro\n{% /callout %}\n",
        );
        let content = ContentDir::new(temp.path());

        let err = content.load(&Slug::from_route("/stray")).unwrap_err();
        assert!(matches!(
            err,
            ContentError::Markup {
                source: MarkupError::UnexpectedClose { line: 7, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_load_unknown_method_is_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "odd.md", "---\nmethod: TRACE\n---\n");
        let content = ContentDir::new(temp.path());
        assert!(content.load(&Slug::from_route("/odd")).is_err());
    }

    #[test]
    fn test_scan() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.md", "---\ntitle: Welcome\n---\n");
        write(temp.path(), "changelog.md", "");
        write(temp.path(), "objects/index.md", "---\ntitle: Objects\n---\n");
        write(temp.path(), "objects/invoice.md", "---\ntitle: Invoice\ndescription: The invoice object\n---\n");
        write(temp.path(), "api-reference/invoices/create.md", "---\ntitle: Create Invoice\nmethod: POST\nendpoint: /invoices\n---\n");
        write(temp.path(), ".drafts/secret.md", "");
        write(temp.path(), "objects/.hidden.md", "");
        write(temp.path(), "objects/notes.txt", "");
        let content = ContentDir::new(temp.path());

        let infos = content.scan().unwrap();
        assert_eq!(
            routes(&infos),
            vec![
                "/api-reference/invoices/create",
                "/changelog",
                "/",
                "/objects",
                "/objects/invoice",
            ]
        );

        let create = &infos[0];
        assert_eq!(create.title, "Create Invoice");
        assert_eq!(create.method, Some(HttpMethod::Post));
        assert_eq!(create.endpoint.as_deref(), Some("/invoices"));
        assert_eq!(infos[1].title, "Changelog");
        assert_eq!(infos[2].title, "Welcome");
        assert_eq!(infos[4].description.as_deref(), Some("The invoice object"));
    }

    #[test]
    fn test_scan_reports_resolvable_file_only() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "guides.md", "---\ntitle: Direct\n---\n");
        write(temp.path(), "guides/index.md", "---\ntitle: Index\n---\n");
        let content = ContentDir::new(temp.path());

        let infos = content.scan().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].title, "Direct");
        assert_eq!(infos[0].path, temp.path().join("guides.md"));
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let content = ContentDir::new(temp.path().join("missing"));
        assert!(matches!(content.scan(), Err(ContentError::Io { .. })));
    }
}
