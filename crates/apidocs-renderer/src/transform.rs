//! Markup tree to renderable tree.
//!
//! One recursive pass expands custom tags, maps built-in markdown nodes to
//! HTML-like tags, annotates code blocks with highlighted markup and indexes
//! `h2`/`h3` headings. Every call returns its rendered node together with the
//! TOC entries and warnings of its subtree; nothing is shared or mutated
//! across calls.

use apidocs_markup::{AttrValue, Markup, MarkupNode};

use crate::error::TransformError;
use crate::highlight::Highlighter;
use crate::node::{RenderNode, RenderTag};
use crate::schema::TagKind;
use crate::toc::{TocEntry, index_heading};

/// Result of transforming one document.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Root of the renderable tree (an `article` tag for a parsed document).
    pub tree: RenderNode,
    /// `h2`/`h3` entries in document order.
    pub toc: Vec<TocEntry>,
    /// Non-fatal problems such as undeclared attributes.
    pub warnings: Vec<String>,
}

/// TOC entries and warnings collected from a subtree.
#[derive(Debug, Default)]
struct Collected {
    toc: Vec<TocEntry>,
    warnings: Vec<String>,
}

impl Collected {
    fn append(&mut self, mut other: Self) {
        self.toc.append(&mut other.toc);
        self.warnings.append(&mut other.warnings);
    }
}

/// Transforms markup trees using a shared [`Highlighter`].
pub struct Transformer<'h> {
    highlighter: &'h Highlighter,
}

impl<'h> Transformer<'h> {
    #[must_use]
    pub fn new(highlighter: &'h Highlighter) -> Self {
        Self { highlighter }
    }

    /// Transform a markup tree.
    ///
    /// Attribute validation failures on custom tags are errors.
    pub fn transform(&self, markup: &Markup) -> Result<Transformed, TransformError> {
        let (tree, collected) = self.node(markup)?;
        Ok(Transformed {
            tree,
            toc: collected.toc,
            warnings: collected.warnings,
        })
    }

    fn node(&self, markup: &Markup) -> Result<(RenderNode, Collected), TransformError> {
        let node = match markup {
            Markup::Text(text) => return Ok((RenderNode::Text(text.clone()), Collected::default())),
            Markup::Node(node) => node,
        };

        let (children, mut collected) = self.children(&node.children)?;
        let mut rendered = if node.is_tag() {
            RenderNode::Tag(custom_tag(node, children, &mut collected.warnings)?)
        } else {
            self.builtin(node, children)
        };

        if let RenderNode::Tag(tag) = &mut rendered
            && let Some(entry) = index_heading(tag)
        {
            collected.toc.insert(0, entry);
        }
        Ok((rendered, collected))
    }

    fn children(&self, children: &[Markup]) -> Result<(Vec<RenderNode>, Collected), TransformError> {
        let mut nodes = Vec::with_capacity(children.len());
        let mut collected = Collected::default();

        for child in children {
            let (node, child_collected) = self.node(child)?;
            collected.append(child_collected);

            if let RenderNode::Text(text) = &node
                && let Some(RenderNode::Text(last)) = nodes.last_mut()
            {
                last.push_str(text);
                continue;
            }
            nodes.push(node);
        }

        Ok((nodes, collected))
    }

    fn builtin(&self, node: &MarkupNode, children: Vec<RenderNode>) -> RenderNode {
        let tag = match node.name.as_str() {
            "document" => RenderTag::new("article"),
            "paragraph" => RenderTag::new("p"),
            "heading" => {
                let level = match node.attr("level") {
                    Some(AttrValue::Integer(n)) => (*n).clamp(1, 6),
                    _ => 1,
                };
                RenderTag::new(format!("h{level}"))
            }
            "list" => {
                let ordered = node.attr("ordered") == Some(&AttrValue::Bool(true));
                copy_attrs(node, RenderTag::new(if ordered { "ol" } else { "ul" }), &["start"])
            }
            "item" => copy_attrs(node, RenderTag::new("li"), &["checked"]),
            "fence" => return RenderNode::Tag(self.code_block(node)),
            "code" => {
                let content = node.attr("content").map(ToString::to_string).unwrap_or_default();
                return RenderNode::Tag(RenderTag::new("code").with_text(&content));
            }
            "link" => copy_attrs(node, RenderTag::new("a"), &["href", "title"]),
            "image" => copy_attrs(node, RenderTag::new("img"), &["src", "alt", "title"]),
            "softbreak" => return RenderNode::Text(" ".to_owned()),
            "hardbreak" => RenderTag::new("br"),
            "footnote" => RenderTag::new("div").with_attr("class", "footnote"),
            other => RenderTag {
                name: other.to_owned(),
                attributes: node.attributes.clone(),
                children: Vec::new(),
            },
        };
        RenderNode::Tag(RenderTag { children, ..tag })
    }

    /// Build a `CodeBlock` from a fence, attaching highlighted markup.
    fn code_block(&self, node: &MarkupNode) -> RenderTag {
        let content = node.attr("content").map(ToString::to_string).unwrap_or_default();
        let language = node.attr("language").map(ToString::to_string).unwrap_or_default();

        let mut tag = RenderTag::new("CodeBlock");
        if !content.is_empty() {
            tag = tag.with_attr("highlightedHtml", self.highlighter.highlight(&content, &language));
        }
        if let Some(title) = node.attr("title").and_then(AttrValue::as_str).filter(|t| !t.is_empty()) {
            tag = tag.with_attr("title", title);
        }
        tag.with_attr("content", content).with_attr("language", language)
    }
}

/// Expand a `{% tag %}` through its schema, or pass it through unchanged.
fn custom_tag(
    node: &MarkupNode,
    children: Vec<RenderNode>,
    warnings: &mut Vec<String>,
) -> Result<RenderTag, TransformError> {
    let Some(schema) = TagKind::from_name(&node.name).schema() else {
        tracing::debug!(tag = %node.name, "Passing through unknown tag");
        return Ok(RenderTag {
            name: node.name.clone(),
            attributes: node.attributes.clone(),
            children,
        });
    };

    schema.check_children(&node.name, &node.children, warnings);
    let attributes = schema.render_attributes(&node.name, &node.attributes, warnings)?;
    Ok(RenderTag {
        name: schema.render.to_owned(),
        attributes,
        children,
    })
}

fn copy_attrs(from: &MarkupNode, mut to: RenderTag, keys: &[&str]) -> RenderTag {
    for key in keys {
        if let Some(value) = from.attr(key) {
            to.attributes.insert((*key).to_owned(), value.clone());
        }
    }
    to
}

/// Transform a parsed document with the given highlighter.
pub fn transform_document(
    markup: &Markup,
    highlighter: &Highlighter,
) -> Result<Transformed, TransformError> {
    Transformer::new(highlighter).transform(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidocs_markup::parse;
    use pretty_assertions::assert_eq;

    fn transform(body: &str) -> Result<Transformed, TransformError> {
        let highlighter = Highlighter::default();
        transform_document(&parse(body).unwrap(), &highlighter)
    }

    fn article(transformed: &Transformed) -> &RenderTag {
        transformed.tree.as_tag().unwrap()
    }

    #[test]
    fn test_heading_toc_entry() {
        let result = transform("## Getting your API Key!\n").unwrap();
        assert_eq!(
            result.toc,
            vec![TocEntry {
                id: "getting-your-api-key".to_owned(),
                title: "Getting your API Key!".to_owned(),
                level: 2,
            }]
        );
        assert_eq!(
            article(&result).children[0],
            RenderNode::Tag(
                RenderTag::new("h2")
                    .with_attr("id", "getting-your-api-key")
                    .with_text("Getting your API Key!")
            )
        );
    }

    #[test]
    fn test_toc_is_in_document_order_and_skips_h1_h4() {
        let body = "\
# Invoices
## Create
### Request
#### Fields
{% tabs %}
{% tab label=\"Details\" %}
## Inside a tab
{% /tab %}
{% /tabs %}
### Response
";
        let result = transform(body).unwrap();
        let entries: Vec<(&str, u8)> = result
            .toc
            .iter()
            .map(|e| (e.id.as_str(), e.level))
            .collect();
        assert_eq!(
            entries,
            vec![("create", 2), ("request", 3), ("inside-a-tab", 2), ("response", 3)]
        );

        let tree = article(&result);
        for entry in &result.toc {
            let name = format!("h{}", entry.level);
            let heading = tree
                .find_all(&name)
                .into_iter()
                .find(|h| h.text() == entry.title)
                .unwrap();
            assert_eq!(heading.attr_str("id"), Some(entry.id.as_str()));
        }
    }

    #[test]
    fn test_duplicate_headings_share_id() {
        let result = transform("## Example\n\n## Example\n").unwrap();
        assert_eq!(result.toc.len(), 2);
        assert_eq!(result.toc[0].id, "example");
        assert_eq!(result.toc[1].id, "example");
    }

    #[test]
    fn test_tabs() {
        let body = "\
{% tabs %}
{% tab label=\"cURL\" %}
Run it.
{% /tab %}
{% /tabs %}
";
        let result = transform(body).unwrap();
        assert_eq!(
            article(&result).children[0],
            RenderNode::Tag(
                RenderTag::new("Tabs").with_child(
                    RenderTag::new("Tab")
                        .with_attr("label", "cURL")
                        .with_child(RenderTag::new("p").with_text("Run it."))
                )
            )
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_code_snippet_group() {
        let body = "\
{% code-snippet-group %}
{% code-snippet title=\"PHP\" %}
```php
<?php echo 1;
```
{% /code-snippet %}
{% /code-snippet-group %}
";
        let result = transform(body).unwrap();
        let tabs = article(&result).children[0].as_tag().unwrap();
        assert_eq!(tabs.name, "Tabs");
        let tab = tabs.children[0].as_tag().unwrap();
        assert_eq!(tab.name, "Tab");
        assert_eq!(tab.attr_str("label"), Some("PHP"));
        assert!(tab.attr("title").is_none());
        assert_eq!(tab.children[0].as_tag().unwrap().name, "CodeBlock");
    }

    #[test]
    fn test_tab_requires_label() {
        let err = transform("{% tabs %}\n{% tab %}\nx\n{% /tab %}\n{% /tabs %}\n").unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingAttribute { ref tag, ref attribute } if tag == "tab" && attribute == "label"
        ));
    }

    #[test]
    fn test_code_snippet_requires_title() {
        let err = transform(
            "{% code-snippet-group %}\n{% code-snippet %}\n```php\necho 1;\n```\n{% /code-snippet %}\n{% /code-snippet-group %}\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingAttribute { ref tag, ref attribute }
                if tag == "code-snippet" && attribute == "title"
        ));
    }

    #[test]
    fn test_callout_default_type() {
        let result = transform("{% callout %}\nHeads up.\n{% /callout %}\n").unwrap();
        let callout = article(&result).children[0].as_tag().unwrap();
        assert_eq!(callout.name, "Callout");
        assert_eq!(callout.attr_str("type"), Some("note"));
    }

    #[test]
    fn test_callout_rejects_unknown_type() {
        let err = transform("{% callout type=\"danger\" %}\nx\n{% /callout %}\n").unwrap_err();
        assert!(matches!(err, TransformError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let result =
            transform("{% partial file=\"header.md\" %}\n## Inside\n{% /partial %}\n").unwrap();
        let partial = article(&result).children[0].as_tag().unwrap();
        assert_eq!(partial.name, "partial");
        assert_eq!(partial.attr_str("file"), Some("header.md"));
        assert_eq!(partial.children[0].as_tag().unwrap().name, "h2");
        assert_eq!(result.toc.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_stray_children_and_attributes_warn() {
        let body = "\
{% tabs sync=true %}
Stray paragraph.
{% tab label=\"A\" %}
a
{% /tab %}
{% /tabs %}
";
        let result = transform(body).unwrap();
        assert_eq!(
            result.warnings,
            vec![
                "`paragraph` is not allowed inside `tabs`",
                "`tabs` does not accept attribute `sync`; dropped",
            ]
        );
    }

    #[test]
    fn test_fence_becomes_highlighted_code_block() {
        let result = transform("```sh {% title=\"Request\" %}\necho hi\n```\n").unwrap();
        let block = article(&result).children[0].as_tag().unwrap();
        assert_eq!(block.name, "CodeBlock");
        assert_eq!(block.attr_str("content"), Some("echo hi\n"));
        assert_eq!(block.attr_str("language"), Some("sh"));
        assert_eq!(block.attr_str("title"), Some("Request"));
        let html = block.attr_str("highlightedHtml").unwrap();
        assert!(html.starts_with(r#"<pre class="highlight" data-language="bash">"#));
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_alias_and_explicit_language_highlight_identically() {
        let sh = transform("```sh\nls -la\n```\n").unwrap();
        let bash = transform("```bash\nls -la\n```\n").unwrap();
        let html = |t: &Transformed| {
            article(t).children[0]
                .as_tag()
                .unwrap()
                .attr_str("highlightedHtml")
                .unwrap()
                .to_owned()
        };
        assert_eq!(html(&sh), html(&bash));
    }

    #[test]
    fn test_empty_fence_has_no_highlighted_html() {
        let result = transform("```json\n```\n").unwrap();
        let block = article(&result).children[0].as_tag().unwrap();
        assert_eq!(block.attr_str("content"), Some(""));
        assert!(block.attr("highlightedHtml").is_none());
        assert!(block.attr("title").is_none());
    }

    #[test]
    fn test_builtin_nodes() {
        let result = transform(
            "Line one\nline two with `code` and [a link](/x).\n\n1. first\n\n---\n",
        )
        .unwrap();
        let tree = article(&result);
        assert_eq!(tree.name, "article");

        let para = tree.children[0].as_tag().unwrap();
        assert_eq!(para.name, "p");
        assert_eq!(para.children[0], RenderNode::Text("Line one line two with ".to_owned()));
        assert_eq!(
            para.children[1],
            RenderNode::Tag(RenderTag::new("code").with_text("code"))
        );
        let link = para.children[3].as_tag().unwrap();
        assert_eq!(link.name, "a");
        assert_eq!(link.attr_str("href"), Some("/x"));

        assert_eq!(tree.children[1].as_tag().unwrap().name, "ol");
        assert_eq!(tree.children[2].as_tag().unwrap().name, "hr");
    }

    #[test]
    fn test_tree_serializes_to_plain_json() {
        let result = transform("{% callout type=\"info\" %}\nHi\n{% /callout %}\n").unwrap();
        let json = serde_json::to_value(&result.tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "article",
                "attributes": {},
                "children": [{
                    "name": "Callout",
                    "attributes": {"type": "info"},
                    "children": [{"name": "p", "attributes": {}, "children": ["Hi"]}],
                }],
            })
        );
    }
}
