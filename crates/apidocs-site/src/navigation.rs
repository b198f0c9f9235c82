//! Navigation tree.
//!
//! ```text
//! Getting Started
//!   Authentication           /getting-started/authentication
//! API Reference
//!   Overview                 /api-reference/overview
//!   Invoices
//!     Create Invoice  POST   /api-reference/invoices/create
//! Changelog                  /changelog
//! ```

use apidocs_config::NavigationConfig;
use apidocs_markup::HttpMethod;
use serde::Serialize;

use crate::content::DocumentInfo;
use crate::sections::{Section, group};

/// Navigation node: a section, a subgroup or a page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavSection>,
}

impl NavSection {
    fn leaf(info: &DocumentInfo) -> Self {
        Self {
            label: info.title.clone(),
            href: Some(info.slug.route()),
            method: info.method,
            children: Vec::new(),
        }
    }

    fn group(label: String, children: Vec<Self>) -> Self {
        Self {
            label,
            href: None,
            method: None,
            children,
        }
    }
}

/// Build the navigation tree from scanned documents.
///
/// The result does not depend on the order of `documents`.
#[must_use]
pub fn build_navigation(documents: &[DocumentInfo], config: &NavigationConfig) -> Vec<NavSection> {
    let grouped = group(documents, config);
    let mut nav: Vec<NavSection> = grouped.sections.into_iter().map(section_node).collect();

    nav.extend(grouped.other.into_iter().map(|info| NavSection {
        label: info.title.clone(),
        href: Some(info.slug.route()),
        method: None,
        children: Vec::new(),
    }));
    nav
}

fn section_node(section: Section<'_, DocumentInfo>) -> NavSection {
    let mut children: Vec<NavSection> = section.direct.into_iter().map(NavSection::leaf).collect();
    children.extend(section.subgroups.into_iter().map(|subgroup| {
        NavSection::group(
            subgroup.label,
            subgroup.entries.into_iter().map(NavSection::leaf).collect(),
        )
    }));
    NavSection::group(section.label, children)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::slug::Slug;

    fn info(route: &str, title: &str, method: Option<HttpMethod>) -> DocumentInfo {
        DocumentInfo {
            slug: Slug::from_route(route),
            title: title.to_owned(),
            description: None,
            method,
            endpoint: None,
            path: PathBuf::from(format!("{route}.md")),
        }
    }

    fn link(label: &str, href: &str, method: Option<HttpMethod>) -> NavSection {
        NavSection {
            label: label.to_owned(),
            href: Some(href.to_owned()),
            method,
            children: Vec::new(),
        }
    }

    fn corpus() -> Vec<DocumentInfo> {
        vec![
            info("/", "Home", None),
            info("/changelog", "Changelog", None),
            info("/api-reference/invoices/create", "Create Invoice", Some(HttpMethod::Post)),
            info("/api-reference/invoices/list", "List Invoices", Some(HttpMethod::Get)),
            info("/api-reference/overview", "Overview", None),
            info("/api-reference/companies/get", "Get Company", Some(HttpMethod::Get)),
            info("/getting-started/quick-start", "Quick Start", None),
            info("/getting-started/authentication", "Authentication", None),
            info("/faq", "FAQ", None),
            info("/concepts/deep/nested", "Nested", None),
        ]
    }

    #[test]
    fn test_build_navigation() {
        let nav = build_navigation(&corpus(), &NavigationConfig::default());

        let expected = vec![
            NavSection::group(
                "Getting Started".to_owned(),
                vec![
                    link("Authentication", "/getting-started/authentication", None),
                    link("Quick Start", "/getting-started/quick-start", None),
                ],
            ),
            NavSection::group(
                "Concepts".to_owned(),
                vec![link("Nested", "/concepts/deep/nested", None)],
            ),
            NavSection::group(
                "API Reference".to_owned(),
                vec![
                    link("Overview", "/api-reference/overview", None),
                    NavSection::group(
                        "Companies".to_owned(),
                        vec![link("Get Company", "/api-reference/companies/get", Some(HttpMethod::Get))],
                    ),
                    NavSection::group(
                        "Invoices".to_owned(),
                        vec![
                            link("Create Invoice", "/api-reference/invoices/create", Some(HttpMethod::Post)),
                            link("List Invoices", "/api-reference/invoices/list", Some(HttpMethod::Get)),
                        ],
                    ),
                ],
            ),
            link("Changelog", "/changelog", None),
            link("FAQ", "/faq", None),
        ];
        assert_eq!(nav, expected);
    }

    #[test]
    fn test_stable_under_reordering() {
        let config = NavigationConfig::default();
        let mut documents = corpus();
        let expected = build_navigation(&documents, &config);

        documents.reverse();
        assert_eq!(build_navigation(&documents, &config), expected);

        documents.rotate_left(3);
        assert_eq!(build_navigation(&documents, &config), expected);
    }

    #[test]
    fn test_labels_fall_back_to_title_case() {
        let config = NavigationConfig {
            sections: vec!["webhooks".to_owned(), "sdk-guides".to_owned()],
            grouped: vec!["sdk-guides".to_owned()],
            labels: [("webhooks".to_owned(), "Webhooks & Events".to_owned())].into(),
        };
        let documents = vec![
            info("/webhooks/events", "Events", None),
            info("/sdk-guides/php/install", "Install", None),
        ];
        let nav = build_navigation(&documents, &config);

        assert_eq!(nav[0].label, "Webhooks & Events");
        assert_eq!(nav[1].label, "Sdk Guides");
        assert_eq!(nav[1].children[0].label, "Php");
        assert_eq!(nav[1].children[0].children[0].href.as_deref(), Some("/sdk-guides/php/install"));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let nav = build_navigation(&[info("/", "Home", None)], &NavigationConfig::default());
        assert!(nav.is_empty());
    }

    #[test]
    fn test_top_level_pages_carry_no_method() {
        let documents = vec![info("/status", "Status", Some(HttpMethod::Get))];
        let nav = build_navigation(&documents, &NavigationConfig::default());
        assert_eq!(nav, vec![link("Status", "/status", None)]);
    }

    #[test]
    fn test_serialized_shape() {
        let documents = vec![info("/api-reference/invoices/create", "Create Invoice", Some(HttpMethod::Post))];
        let nav = build_navigation(&documents, &NavigationConfig::default());
        let json = serde_json::to_value(&nav).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "label": "API Reference",
                "children": [{
                    "label": "Invoices",
                    "children": [{
                        "label": "Create Invoice",
                        "href": "/api-reference/invoices/create",
                        "method": "POST"
                    }]
                }]
            }])
        );
    }
}
