use std::fmt;

use serde::{Serialize, Serializer};

/// Document identifier: the ordered path segments below the content root.
///
/// The empty slug is the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(Vec<String>);

impl Slug {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The home page slug.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a route such as `/api-reference/invoices/create`.
    ///
    /// Leading, trailing and repeated slashes are ignored, so `/` and the
    /// empty string both yield the root slug.
    #[must_use]
    pub fn from_route(route: &str) -> Self {
        Self(
            route
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segment at `index`, if present.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Last segment, used for filename-derived titles.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// URL route: `/` for the root, `/a/b` otherwise.
    #[must_use]
    pub fn route(&self) -> String {
        if self.0.is_empty() {
            "/".to_owned()
        } else {
            format!("/{}", self.0.join("/"))
        }
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}

impl Serialize for Slug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.route())
    }
}

impl<S: Into<String>> FromIterator<S> for Slug {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
