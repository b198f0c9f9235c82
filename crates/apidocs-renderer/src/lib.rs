//! Content transformation pipeline for API documentation pages.
//!
//! Turns a parsed markup tree into a plain, serializable renderable tree:
//!
//! - custom tags (`tabs`/`tab`, `code-snippet-group`/`code-snippet`,
//!   `callout`) are validated against their [`Schema`] and expanded
//! - fenced code becomes `CodeBlock` tags carrying highlighted markup from
//!   a shared [`Highlighter`]
//! - `h2`/`h3` headings receive slug ids and yield [`TocEntry`]s
//!
//! All three happen in one recursive pass.
//!
//! # Example
//!
//! ```
//! use apidocs_markup::parse;
//! use apidocs_renderer::{Highlighter, render_html, transform_document};
//!
//! let highlighter = Highlighter::default();
//! let markup = parse("## Authentication\n\n{% callout %}\nKeep keys secret.\n{% /callout %}\n").unwrap();
//! let result = transform_document(&markup, &highlighter).unwrap();
//!
//! assert_eq!(result.toc[0].id, "authentication");
//! assert!(render_html(&result.tree).contains(r#"class="callout callout-note""#));
//! ```

mod error;
mod highlight;
mod html;
mod node;
mod schema;
mod toc;
mod transform;
mod util;

pub use error::{HighlightError, TransformError};
pub use highlight::{HighlightConfig, Highlighter, PLAIN_TEXT, resolve_language};
pub use html::render_html;
pub use node::{RenderNode, RenderTag};
pub use schema::{AttributeSpec, Schema, TagKind};
pub use toc::TocEntry;
pub use transform::{Transformed, Transformer, transform_document};
pub use util::escape_html;
