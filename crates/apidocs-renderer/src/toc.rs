use apidocs_markup::{AttrValue, slugify};
use serde::Serialize;

use crate::node::RenderTag;

/// Table of contents entry for an `h2` or `h3` heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Anchor id, equal to the `id` attribute of the heading.
    pub id: String,
    /// Plain heading text.
    pub title: String,
    /// Heading level (2 or 3).
    pub level: u8,
}

/// Give an `h2`/`h3` tag its `id` and return its TOC entry.
///
/// Other tags are left untouched. Identical headings receive identical ids.
pub(crate) fn index_heading(tag: &mut RenderTag) -> Option<TocEntry> {
    let level = match tag.name.as_str() {
        "h2" => 2,
        "h3" => 3,
        _ => return None,
    };
    let title = tag.text();
    let id = slugify(&title);
    tag.attributes.insert("id".to_owned(), AttrValue::String(id.clone()));
    Some(TocEntry { id, title, level })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_h2() {
        let mut tag = RenderTag::new("h2").with_text("Getting your API Key!");
        let entry = index_heading(&mut tag).unwrap();
        assert_eq!(
            entry,
            TocEntry {
                id: "getting-your-api-key".to_owned(),
                title: "Getting your API Key!".to_owned(),
                level: 2,
            }
        );
        assert_eq!(tag.attr_str("id"), Some("getting-your-api-key"));
    }

    #[test]
    fn test_index_h3_with_inline_markup() {
        let mut tag = RenderTag::new("h3")
            .with_text("The ")
            .with_child(RenderTag::new("code").with_text("invoice"))
            .with_text(" object");
        let entry = index_heading(&mut tag).unwrap();
        assert_eq!(entry.id, "the-invoice-object");
        assert_eq!(entry.title, "The invoice object");
        assert_eq!(entry.level, 3);
    }

    #[test]
    fn test_other_levels_ignored() {
        for name in ["h1", "h4", "p"] {
            let mut tag = RenderTag::new(name).with_text("Title");
            assert!(index_heading(&mut tag).is_none());
            assert!(tag.attr("id").is_none());
        }
    }
}
