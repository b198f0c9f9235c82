//! Markdoc-flavoured markup for API documentation pages.
//!
//! Turns the raw text of a content file into metadata and a generic markup
//! tree:
//!
//! - [`parse_source`] splits the YAML [`Frontmatter`] from the body
//! - [`parse`] parses the body into a [`Markup`] tree of built-in markdown
//!   nodes and `{% tag %}` nodes
//!
//! # Example
//!
//! ```
//! use apidocs_markup::{parse, parse_source, HttpMethod};
//!
//! let raw = "---\ntitle: Create Invoice\nmethod: post\n---\n## Request\n";
//! let (frontmatter, body) = parse_source(raw).unwrap();
//! assert_eq!(frontmatter.method, Some(HttpMethod::Post));
//!
//! let tree = parse(body).unwrap();
//! assert_eq!(tree.text(), "Request");
//! ```

mod attributes;
mod error;
mod frontmatter;
mod node;
mod parser;
mod slug;

pub use error::MarkupError;
pub use frontmatter::{Frontmatter, HttpMethod, UnknownMethod, parse_source, split_frontmatter};
pub use node::{AttrValue, Attributes, Markup, MarkupNode, NodeKind};
pub use parser::parse;
pub use slug::{slugify, title_case};
