//! Plain-text exports for language models.
//!
//! - [`llms_index`]: one link line per page, grouped like the navigation
//! - [`llms_full`]: every page body concatenated, tag markers removed
//!
//! Both work on the raw body text, not the transformed tree.

use std::sync::LazyLock;

use apidocs_config::{NavigationConfig, SiteConfig};
use regex::Regex;

use crate::content::Document;
use crate::sections::{Grouped, by_title, group};

static TAG_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*/?\w[\w-]*(?:\s+[^%]*)?\s*%\}").unwrap());

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Heading of the pages outside every configured section.
const OTHER_HEADING: &str = "Other";

/// Remove `{% ... %}` markers and collapse the blank lines they leave behind.
#[must_use]
pub fn strip_tags(body: &str) -> String {
    let stripped = TAG_MARKER.replace_all(body, "");
    BLANK_RUNS.replace_all(&stripped, "\n\n").trim().to_owned()
}

/// A titled run of documents in export order.
struct Block<'a> {
    heading: String,
    documents: Vec<&'a Document>,
}

/// Flatten the section grouping into headed blocks.
///
/// Grouped sections yield their direct pages under the section label, then
/// one `Label: Subgroup` block per subgroup.
fn blocks<'a>(grouped: Grouped<'a, Document>) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    for section in grouped.sections {
        if !section.direct.is_empty() {
            blocks.push(Block {
                heading: section.label.clone(),
                documents: section.direct,
            });
        }
        for subgroup in section.subgroups {
            blocks.push(Block {
                heading: format!("{}: {}", section.label, subgroup.label),
                documents: subgroup.entries,
            });
        }
    }

    if !grouped.other.is_empty() {
        let mut other = grouped.other;
        other.sort_by(|a, b| by_title(*a, *b));
        blocks.push(Block {
            heading: OTHER_HEADING.to_owned(),
            documents: other,
        });
    }
    blocks
}

fn push_site_links(lines: &mut Vec<String>, site: &SiteConfig) {
    if let Some(api_url) = &site.api_url {
        lines.push(format!("Base URL: {api_url}"));
    }
    lines.push(format!("Docs: {}", site.base_url));
}

/// Lightweight index (`llms.txt`).
///
/// ```text
/// # Acme API
///
/// > Invoicing for everyone.
///
/// Base URL: https://api.acme.test
/// Docs: https://docs.acme.test
///
/// ## Getting Started
///
/// - [Quick Start](https://docs.acme.test/getting-started/quick-start): First request
/// ```
#[must_use]
pub fn llms_index(documents: &[Document], site: &SiteConfig, navigation: &NavigationConfig) -> String {
    let mut lines = vec![format!("# {}", site.title), String::new()];
    if let Some(summary) = &site.summary {
        lines.push(format!("> {summary}"));
        lines.push(String::new());
    }
    push_site_links(&mut lines, site);

    for block in blocks(group(documents, navigation)) {
        lines.push(String::new());
        lines.push(format!("## {}", block.heading));
        lines.push(String::new());
        for document in block.documents {
            let url = site.url_for(&document.slug.route());
            match document.description() {
                Some(description) => {
                    lines.push(format!("- [{}]({url}): {description}", document.title()));
                }
                None => lines.push(format!("- [{}]({url})", document.title())),
            }
        }
    }

    lines.join("\n") + "\n"
}

/// Full-content export (`llms-full.txt`).
#[must_use]
pub fn llms_full(documents: &[Document], site: &SiteConfig, navigation: &NavigationConfig) -> String {
    let mut lines = vec![format!("# {}: Full Content", site.title), String::new()];
    if let Some(summary) = &site.summary {
        lines.push(format!("> {summary}"));
        lines.push(String::new());
    }
    push_site_links(&mut lines, site);
    lines.push(String::new());

    for block in blocks(group(documents, navigation)) {
        for document in block.documents {
            lines.push("---".to_owned());
            lines.push(String::new());
            lines.push(format!("## {}", document.title()));
            if let Some(description) = document.description() {
                lines.push(String::new());
                lines.push(format!("> {description}"));
            }
            lines.push(String::new());
            lines.push(format!("URL: {}", site.url_for(&document.slug.route())));
            lines.push(String::new());
            lines.push(strip_tags(&document.source));
            lines.push(String::new());
        }
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use apidocs_markup::{Frontmatter, Markup, MarkupNode};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::slug::Slug;

    fn doc(route: &str, title: &str, description: Option<&str>, source: &str) -> Document {
        Document {
            slug: Slug::from_route(route),
            frontmatter: Frontmatter {
                title: Some(title.to_owned()),
                description: description.map(str::to_owned),
                ..Frontmatter::default()
            },
            body: Markup::Node(MarkupNode::node("document")),
            source: source.to_owned(),
            path: PathBuf::from(format!("{route}.md")),
        }
    }

    fn site() -> SiteConfig {
        SiteConfig {
            title: "Acme API".to_owned(),
            summary: Some("Invoicing for everyone.".to_owned()),
            base_url: "https://docs.acme.test/".to_owned(),
            api_url: Some("https://api.acme.test".to_owned()),
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            doc("/", "Home", Some("Welcome"), "Hello"),
            doc("/faq", "FAQ", None, "Questions"),
            doc("/changelog", "Changelog", Some("Release notes"), "v1"),
            doc("/api-reference/invoices/create", "Create Invoice", Some("POST /invoices"), "Create one"),
            doc("/api-reference/authentication", "Authentication", Some("API keys"), "Keys"),
            doc("/getting-started/quick-start", "Quick Start", Some("First request"), "Go"),
        ]
    }

    #[test]
    fn test_strip_tags() {
        let body = "Intro\n\n{% callout type=\"warning\" %}\nCareful\n{% /callout %}\n\n\n\nEnd\n";
        assert_eq!(strip_tags(body), "Intro\n\nCareful\n\nEnd");
        assert_eq!(strip_tags("{% tabs %}{% tab label=\"cURL\" %}x{% /tab %}{% /tabs %}"), "x");
        assert_eq!(strip_tags("Text with 50% off"), "Text with 50% off");
    }

    #[test]
    fn test_llms_index() {
        let output = llms_index(&corpus(), &site(), &NavigationConfig::default());
        let expected = "\
# Acme API

> Invoicing for everyone.

Base URL: https://api.acme.test
Docs: https://docs.acme.test/

## Getting Started

- [Quick Start](https://docs.acme.test/getting-started/quick-start): First request

## API Reference

- [Authentication](https://docs.acme.test/api-reference/authentication): API keys

## API Reference: Invoices

- [Create Invoice](https://docs.acme.test/api-reference/invoices/create): POST /invoices

## Other

- [Changelog](https://docs.acme.test/changelog): Release notes
- [FAQ](https://docs.acme.test/faq)
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_llms_full() {
        let documents = vec![
            doc("/", "Home", None, "Hello"),
            doc("/concepts/webhooks", "Webhooks", Some("Events"), "{% callout %}\nRetry\n{% /callout %}\n"),
            doc("/changelog", "Changelog", None, "v1"),
        ];
        let site = SiteConfig {
            summary: None,
            api_url: None,
            ..site()
        };
        let output = llms_full(&documents, &site, &NavigationConfig::default());
        let expected = "\
# Acme API: Full Content

Docs: https://docs.acme.test/

---

## Webhooks

> Events

URL: https://docs.acme.test/concepts/webhooks

Retry

---

## Changelog

URL: https://docs.acme.test/changelog

v1

";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_home_is_excluded() {
        let output = llms_index(&[doc("/", "Home", Some("Welcome"), "Hello")], &site(), &NavigationConfig::default());
        assert!(!output.contains("Home"));
        assert!(output.ends_with("Docs: https://docs.acme.test/\n"));
    }
}
