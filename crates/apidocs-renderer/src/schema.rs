//! Custom tag registry.
//!
//! The set of tags with special rendering is closed: every name maps to a
//! [`TagKind`], and anything unrecognized is [`TagKind::Passthrough`].

use apidocs_markup::{AttrValue, Attributes, Markup};

use crate::error::TransformError;

/// Declared attribute of a custom tag. All declared attributes are strings.
#[derive(Debug)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
    /// Allowed values, when enumerated.
    pub matches: Option<&'static [&'static str]>,
    /// Attribute name on the rendered tag.
    pub render_as: &'static str,
}

/// Rendering rules of a custom tag.
#[derive(Debug)]
pub struct Schema {
    /// Name of the rendered tag.
    pub render: &'static str,
    pub attributes: &'static [AttributeSpec],
    /// Allowed child types; `None` allows anything. Tag children match
    /// either their own name or `"tag"`.
    pub children: Option<&'static [&'static str]>,
}

static TABS: Schema = Schema {
    render: "Tabs",
    attributes: &[],
    children: Some(&["tab"]),
};

static TAB: Schema = Schema {
    render: "Tab",
    attributes: &[AttributeSpec {
        name: "label",
        required: true,
        default: None,
        matches: None,
        render_as: "label",
    }],
    children: None,
};

static CODE_SNIPPET_GROUP: Schema = Schema {
    render: "Tabs",
    attributes: &[],
    children: Some(&["code-snippet"]),
};

static CODE_SNIPPET: Schema = Schema {
    render: "Tab",
    attributes: &[AttributeSpec {
        name: "title",
        required: true,
        default: None,
        matches: None,
        render_as: "label",
    }],
    children: None,
};

static CALLOUT: Schema = Schema {
    render: "Callout",
    attributes: &[AttributeSpec {
        name: "type",
        required: false,
        default: Some("note"),
        matches: Some(&["note", "warning", "info"]),
        render_as: "type",
    }],
    children: Some(&["paragraph", "tag", "list"]),
};

/// Custom tag kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    Tabs,
    Tab,
    CodeSnippetGroup,
    CodeSnippet,
    Callout,
    /// Unknown tag, rendered unchanged.
    Passthrough(&'a str),
}

impl<'a> TagKind<'a> {
    #[must_use]
    pub fn from_name(name: &'a str) -> Self {
        match name {
            "tabs" => Self::Tabs,
            "tab" => Self::Tab,
            "code-snippet-group" => Self::CodeSnippetGroup,
            "code-snippet" => Self::CodeSnippet,
            "callout" => Self::Callout,
            other => Self::Passthrough(other),
        }
    }

    /// Schema of a custom tag; `None` for passthrough.
    #[must_use]
    pub fn schema(self) -> Option<&'static Schema> {
        match self {
            Self::Tabs => Some(&TABS),
            Self::Tab => Some(&TAB),
            Self::CodeSnippetGroup => Some(&CODE_SNIPPET_GROUP),
            Self::CodeSnippet => Some(&CODE_SNIPPET),
            Self::Callout => Some(&CALLOUT),
            Self::Passthrough(_) => None,
        }
    }
}

impl Schema {
    /// Validate `attrs` and produce the rendered attribute map.
    ///
    /// Missing required attributes, non-string values and values outside an
    /// enumerated set are errors. Undeclared attributes are dropped with a
    /// warning.
    pub(crate) fn render_attributes(
        &self,
        tag: &str,
        attrs: &Attributes,
        warnings: &mut Vec<String>,
    ) -> Result<Attributes, TransformError> {
        let mut rendered = Attributes::new();

        for spec in self.attributes {
            let value = match attrs.get(spec.name) {
                Some(AttrValue::String(value)) => value.as_str(),
                Some(other) => {
                    return Err(TransformError::InvalidAttribute {
                        tag: tag.to_owned(),
                        attribute: spec.name.to_owned(),
                        message: format!("expected a string, found {}", other.type_name()),
                    });
                }
                None if spec.required => {
                    return Err(TransformError::MissingAttribute {
                        tag: tag.to_owned(),
                        attribute: spec.name.to_owned(),
                    });
                }
                None => match spec.default {
                    Some(default) => default,
                    None => continue,
                },
            };

            if let Some(allowed) = spec.matches
                && !allowed.contains(&value)
            {
                return Err(TransformError::InvalidAttribute {
                    tag: tag.to_owned(),
                    attribute: spec.name.to_owned(),
                    message: format!("`{value}` is not one of {}", allowed.join(", ")),
                });
            }
            rendered.insert(spec.render_as.to_owned(), AttrValue::from(value));
        }

        for key in attrs.keys() {
            if !self.attributes.iter().any(|spec| spec.name == key) {
                warnings.push(format!("`{tag}` does not accept attribute `{key}`; dropped"));
            }
        }

        Ok(rendered)
    }

    /// Warn about children the schema does not allow.
    pub(crate) fn check_children(&self, tag: &str, children: &[Markup], warnings: &mut Vec<String>) {
        let Some(allowed) = self.children else {
            return;
        };
        for child in children {
            let child_type = match child {
                Markup::Text(text) if text.trim().is_empty() => continue,
                Markup::Text(_) => "text",
                Markup::Node(node) => {
                    if node.is_tag() && allowed.contains(&"tag") {
                        continue;
                    }
                    node.name.as_str()
                }
            };
            if !allowed.contains(&child_type) {
                warnings.push(format!("`{child_type}` is not allowed inside `{tag}`"));
            }
        }
    }
}
