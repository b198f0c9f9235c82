//! Markup tree produced by the parser.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Attribute mapping of a node, ordered by key.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Scalar attribute value.
///
/// Serializes as a plain JSON scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` / `false`, or a bare flag.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Quoted or bare-word string.
    String(String),
}

impl AttrValue {
    /// String content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Bool(_) | Self::Integer(_) => None,
        }
    }

    /// Name of the value's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Whether a node is built-in markdown or an authored `{% tag %}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Markdown construct (paragraph, heading, fence, ...).
    Node,
    /// Markdoc block tag.
    Tag,
}

/// A markup tree child: text leaf or nested node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Markup {
    Text(String),
    Node(MarkupNode),
}

impl Markup {
    /// Concatenated text of this subtree.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(s) => out.push_str(s),
            Self::Node(node) => {
                for child in &node.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// The node, if this is not a text leaf.
    #[must_use]
    pub fn as_node(&self) -> Option<&MarkupNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }
}

impl From<MarkupNode> for Markup {
    fn from(node: MarkupNode) -> Self {
        Self::Node(node)
    }
}

/// Parsed node with name, attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupNode {
    pub kind: NodeKind,
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Markup>,
}

impl MarkupNode {
    /// Built-in markdown node.
    #[must_use]
    pub fn node(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Node, name.into())
    }

    /// Markdoc tag node.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Tag, name.into())
    }

    fn new(kind: NodeKind, name: String) -> Self {
        Self {
            kind,
            name,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Markup>) -> Self {
        self.push(child.into());
        self
    }

    /// Builder-style text append.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.push_text(text);
        self
    }

    /// Append a child, merging adjacent text leaves.
    pub fn push(&mut self, child: Markup) {
        match child {
            Markup::Text(text) => self.push_text(&text),
            node @ Markup::Node(_) => self.children.push(node),
        }
    }

    /// Append text, merging into a trailing text leaf.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Markup::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Markup::Text(text.to_owned()));
        }
    }

    /// Attribute lookup.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Whether this is a `{% tag %}` node.
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.kind == NodeKind::Tag
    }
}
