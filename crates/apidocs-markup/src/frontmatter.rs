//! YAML frontmatter.
//!
//! A document whose first line is `---` carries a YAML header that ends at
//! the next line consisting of `---`:
//!
//! ```text
//! ---
//! title: Create Invoice
//! method: POST
//! endpoint: /invoices
//! ---
//! Body text...
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarkupError;

/// Document metadata.
///
/// All fields are optional; blank strings are treated as absent.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// API path documented by the page, e.g. `/invoices/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Frontmatter {
    /// Parse a YAML header.
    ///
    /// Empty content yields the default (all fields absent).
    pub fn from_yaml(content: &str) -> Result<Self, MarkupError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut frontmatter: Self = serde_yaml::from_str(trimmed)?;
        for field in [
            &mut frontmatter.title,
            &mut frontmatter.description,
            &mut frontmatter.endpoint,
        ] {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        Ok(frontmatter)
    }
}

/// HTTP method tag of an endpoint page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method name outside GET/POST/PUT/PATCH/DELETE.
#[derive(Debug, thiserror::Error)]
#[error("unsupported HTTP method `{0}` (expected GET, POST, PUT, PATCH or DELETE)")]
pub struct UnknownMethod(String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnknownMethod(s.to_owned())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = UnknownMethod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Split raw document text into the YAML header and the body.
///
/// A leading byte-order mark is ignored. Text that does not start with a
/// `---` line has no header.
pub fn split_frontmatter(raw: &str) -> Result<(Option<&str>, &str), MarkupError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(rest) = strip_fence_line(raw) else {
        return Ok((None, raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(MarkupError::UnclosedFrontmatter)
}

/// Split and parse the header of a document, returning metadata and body.
pub fn parse_source(raw: &str) -> Result<(Frontmatter, &str), MarkupError> {
    let (header, body) = split_frontmatter(raw)?;
    let frontmatter = match header {
        Some(yaml) => Frontmatter::from_yaml(yaml)?,
        None => Frontmatter::default(),
    };
    Ok((frontmatter, body))
}

fn strip_fence_line(s: &str) -> Option<&str> {
    let end = s.find('\n').map_or(s.len(), |i| i + 1);
    is_fence(&s[..end]).then(|| &s[end..])
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}
