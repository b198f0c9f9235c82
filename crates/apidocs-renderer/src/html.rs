//! HTML serialization of the renderable tree.
//!
//! Custom components become plain HTML:
//!
//! ```html
//! <div class="tabs" id="tabs-0">
//!   <div class="tabs-buttons" role="tablist">
//!     <button role="tab" id="tab-0-0" aria-controls="panel-0-0"
//!             aria-selected="true" tabindex="0">cURL</button>
//!   </div>
//!   <div role="tabpanel" id="panel-0-0" aria-labelledby="tab-0-0">...</div>
//! </div>
//!
//! <div class="callout callout-note">
//!   <div class="callout-title">Note</div>
//!   <div class="callout-content">...</div>
//! </div>
//! ```
//!
//! Code blocks use their pre-rendered `highlightedHtml` when present.

use std::fmt::Write;

use apidocs_markup::AttrValue;

use crate::node::{RenderNode, RenderTag};
use crate::util::escape_html;

/// HTML elements rendered as-is. Other tag names become `<div data-tag>`.
const ELEMENTS: &[&str] = &[
    "a", "article", "blockquote", "br", "code", "dd", "div", "dl", "dt", "em", "h1", "h2", "h3",
    "h4", "h5", "h6", "hr", "img", "li", "ol", "p", "pre", "s", "span", "strong", "sub", "sup",
    "table", "tbody", "td", "th", "thead", "tr", "ul",
];

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// Serialize a renderable tree to HTML.
#[must_use]
pub fn render_html(tree: &RenderNode) -> String {
    let mut writer = HtmlWriter::default();
    writer.node(tree);
    writer.output
}

#[derive(Default)]
struct HtmlWriter {
    output: String,
    tabs_count: usize,
}

impl HtmlWriter {
    fn node(&mut self, node: &RenderNode) {
        match node {
            RenderNode::Text(text) => self.output.push_str(&escape_html(text)),
            RenderNode::Tag(tag) => match tag.name.as_str() {
                "Tabs" => self.tabs(tag),
                "Tab" => self.wrapped(r#"<div class="tab-panel">"#, tag),
                "Callout" => self.callout(tag),
                "CodeBlock" => self.code_block(tag),
                "th" | "td" => self.table_cell(tag),
                "li" => self.list_item(tag),
                _ => self.element(tag),
            },
        }
    }

    fn children(&mut self, tag: &RenderTag) {
        for child in &tag.children {
            self.node(child);
        }
    }

    fn wrapped(&mut self, open: &str, tag: &RenderTag) {
        self.output.push_str(open);
        self.children(tag);
        self.output.push_str("</div>");
    }

    fn element(&mut self, tag: &RenderTag) {
        let known = ELEMENTS.contains(&tag.name.as_str());
        let name = if known { tag.name.as_str() } else { "div" };

        self.output.push('<');
        self.output.push_str(name);
        if !known {
            let _ = write!(self.output, r#" data-tag="{}""#, escape_html(&tag.name));
        }
        self.attributes(tag, &[]);
        self.output.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        self.children(tag);
        let _ = write!(self.output, "</{name}>");
    }

    fn attributes(&mut self, tag: &RenderTag, skip: &[&str]) {
        for (key, value) in &tag.attributes {
            if skip.contains(&key.as_str()) {
                continue;
            }
            match value {
                AttrValue::Bool(true) => {
                    let _ = write!(self.output, " {key}");
                }
                AttrValue::Bool(false) => {}
                other => {
                    let _ = write!(self.output, r#" {key}="{}""#, escape_html(&other.to_string()));
                }
            }
        }
    }

    fn table_cell(&mut self, tag: &RenderTag) {
        let _ = write!(self.output, "<{}", tag.name);
        if let Some(align) = tag.attr_str("align") {
            let _ = write!(self.output, r#" style="text-align: {}""#, escape_html(align));
        }
        self.attributes(tag, &["align"]);
        self.output.push('>');
        self.children(tag);
        let _ = write!(self.output, "</{}>", tag.name);
    }

    fn list_item(&mut self, tag: &RenderTag) {
        match tag.attr("checked") {
            Some(AttrValue::Bool(checked)) => {
                self.output.push_str(r#"<li class="task-list-item"><input type="checkbox" disabled"#);
                if *checked {
                    self.output.push_str(" checked");
                }
                self.output.push('>');
            }
            _ => self.output.push_str("<li>"),
        }
        self.children(tag);
        self.output.push_str("</li>");
    }

    fn tabs(&mut self, tag: &RenderTag) {
        let group = self.tabs_count;
        self.tabs_count += 1;
        let panels: Vec<&RenderTag> = tag
            .children
            .iter()
            .filter_map(RenderNode::as_tag)
            .filter(|child| child.name == "Tab")
            .collect();

        let _ = write!(self.output, r#"<div class="tabs" id="tabs-{group}">"#);
        self.output.push_str(r#"<div class="tabs-buttons" role="tablist">"#);
        for (idx, panel) in panels.iter().enumerate() {
            let selected = idx == 0;
            let _ = write!(
                self.output,
                r#"<button role="tab" id="tab-{group}-{idx}" aria-controls="panel-{group}-{idx}" aria-selected="{selected}" tabindex="{}">{}</button>"#,
                if selected { "0" } else { "-1" },
                escape_html(panel.attr_str("label").unwrap_or_default())
            );
        }
        self.output.push_str("</div>");

        for (idx, panel) in panels.iter().enumerate() {
            let hidden = if idx == 0 { "" } else { " hidden" };
            let open = format!(
                r#"<div role="tabpanel" id="panel-{group}-{idx}" aria-labelledby="tab-{group}-{idx}"{hidden}>"#
            );
            self.wrapped(&open, panel);
        }
        self.output.push_str("</div>");
    }

    fn callout(&mut self, tag: &RenderTag) {
        let kind = tag.attr_str("type").unwrap_or("note");
        let title = match kind {
            "warning" => "Warning",
            "info" => "Info",
            _ => "Note",
        };
        let _ = write!(
            self.output,
            r#"<div class="callout callout-{}"><div class="callout-title">{title}</div>"#,
            escape_html(kind)
        );
        self.wrapped(r#"<div class="callout-content">"#, tag);
        self.output.push_str("</div>");
    }

    fn code_block(&mut self, tag: &RenderTag) {
        self.output.push_str(r#"<div class="code-block">"#);
        if let Some(title) = tag.attr_str("title") {
            let _ = write!(
                self.output,
                r#"<div class="code-block-title">{}</div>"#,
                escape_html(title)
            );
        }
        if let Some(highlighted) = tag.attr_str("highlightedHtml") {
            self.output.push_str(highlighted);
        } else {
            let content = tag.attr_str("content").unwrap_or_default();
            match tag.attr_str("language").filter(|l| !l.is_empty()) {
                Some(lang) => {
                    let _ = write!(
                        self.output,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(lang),
                        escape_html(content)
                    );
                }
                None => {
                    let _ = write!(self.output, "<pre><code>{}</code></pre>", escape_html(content));
                }
            }
        }
        self.output.push_str("</div>");
    }
}
