//! Renderable tree.
//!
//! Plain, serializable data: text leaves and tags with attributes and
//! children. Text serializes as a JSON string, tags as objects.

use apidocs_markup::{AttrValue, Attributes};
use serde::Serialize;

/// Node of the renderable tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderNode {
    Text(String),
    Tag(RenderTag),
}

impl RenderNode {
    /// Concatenated text of all descendant leaves.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Tag(tag) => tag.text(),
        }
    }

    /// The tag, if this is not a text leaf.
    #[must_use]
    pub fn as_tag(&self) -> Option<&RenderTag> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }
}

impl From<RenderTag> for RenderNode {
    fn from(tag: RenderTag) -> Self {
        Self::Tag(tag)
    }
}

/// Tag with name, attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderTag {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<RenderNode>,
}

impl RenderTag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.with_child(RenderNode::Text(text.to_owned()))
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// String attribute lookup; non-string values read as absent.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    /// Concatenated text of all descendant leaves, ignoring markup.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Depth-first search for tags with the given name, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&RenderTag> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a RenderTag>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            if let RenderNode::Tag(tag) = child {
                tag.collect_named(name, found);
            }
        }
    }
}

fn collect_text(children: &[RenderNode], out: &mut String) {
    for child in children {
        match child {
            RenderNode::Text(s) => out.push_str(s),
            RenderNode::Tag(tag) => collect_text(&tag.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_ignores_markup() {
        let tag = RenderTag::new("h2")
            .with_text("Getting your ")
            .with_child(RenderTag::new("code").with_text("API"))
            .with_text(" Key!");
        assert_eq!(tag.text(), "Getting your API Key!");
    }

    #[test]
    fn test_find_all_in_document_order() {
        let tree = RenderTag::new("article")
            .with_child(RenderTag::new("h2").with_text("One"))
            .with_child(RenderTag::new("Tabs").with_child(RenderTag::new("h2").with_text("Two")));
        let titles: Vec<String> = tree.find_all("h2").iter().map(|t| t.text()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_serializes_text_as_string() {
        let tag = RenderTag::new("p").with_attr("class", "lead").with_text("Hi");
        let json = serde_json::to_value(RenderNode::from(tag)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "p", "attributes": {"class": "lead"}, "children": ["Hi"]})
        );
    }
}
