use apidocs_markup::HttpMethod;
use serde::Serialize;

use crate::content::DocumentInfo;

/// Maximum number of results returned by [`search`].
pub const MAX_RESULTS: usize = 20;

/// Flat search index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub title: String,
    pub href: String,
    /// Endpoint path for API pages, otherwise the page description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}

/// One search item per document, home page included, in input order.
#[must_use]
pub fn build_search_index(documents: &[DocumentInfo]) -> Vec<SearchItem> {
    documents
        .iter()
        .map(|info| SearchItem {
            title: info.title.clone(),
            href: info.slug.route(),
            description: info.endpoint.clone().or_else(|| info.description.clone()),
            method: info.method,
        })
        .collect()
}

/// Case-insensitive substring search over title, description and route.
///
/// An empty query matches nothing. Results keep index order and are capped
/// at [`MAX_RESULTS`].
#[must_use]
pub fn search<'a>(items: &'a [SearchItem], query: &str) -> Vec<&'a SearchItem> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    items
        .iter()
        .filter(|item| {
            matches(&item.title)
                || item.description.as_deref().is_some_and(matches)
                || matches(&item.href)
        })
        .take(MAX_RESULTS)
        .collect()
}
