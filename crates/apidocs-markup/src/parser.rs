//! Markdoc-flavoured markdown parser.
//!
//! Block tags occupy a whole line and nest:
//!
//! ```text
//! {% tabs %}
//! {% tab label="cURL" %}
//! ...markdown...
//! {% /tab %}
//! {% /tabs %}
//! ```
//!
//! `{% name ... /%}` is self-closing. Tag lines inside fenced code blocks are
//! code, not tags. Tags written inline within a paragraph are kept as text.
//!
//! The whole body goes through pulldown-cmark in one pass. Each tag line is
//! first replaced by an HTML comment placeholder with the same indentation,
//! so a tag indented under a list item stays inside that item and link
//! reference definitions resolve across tags. The lowerer turns placeholder
//! blocks back into tag nodes.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};

use crate::attributes::parse_attributes;
use crate::error::MarkupError;
use crate::node::{AttrValue, Markup, MarkupNode};

/// A line holding exactly one tag: `{% name attrs %}`, `{% /name %}` or `{% name attrs /%}`.
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{%\s*(/)?([A-Za-z][\w-]*)((?:[^%]|%[^}])*?)(/)?\s*%\}\s*$").unwrap()
});

/// Markdoc annotation in a fence info string: ```` ```js {% title="x" %} ````.
static FENCE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*(.*?)\s*%\}").unwrap());

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--apidocs-tag:(\d+)-->").unwrap());

const OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS);

/// Parse a document body into a `document` node.
pub fn parse(body: &str) -> Result<Markup, MarkupError> {
    let (text, tags) = replace_tag_lines(body)?;
    let mut lowerer = Lowerer::new(tags);
    for event in Parser::new_ext(&text, OPTIONS) {
        lowerer.event(event)?;
    }
    lowerer.finish()
}

/// A tag line cut out of the body, waiting for its placeholder.
struct PendingTag {
    tag: Option<TagLine>,
    /// Original line without indentation, restored where the placeholder
    /// ends up as code or inline text.
    source: String,
}

/// Swap every tag line outside fenced code for a placeholder comment.
fn replace_tag_lines(body: &str) -> Result<(String, Vec<PendingTag>), MarkupError> {
    let mut text = String::with_capacity(body.len());
    let mut tags = Vec::new();
    let mut fence: Option<FenceMarker> = None;

    for (index, line) in body.split_inclusive('\n').enumerate() {
        if let Some(open) = fence {
            if open.is_closed_by(line) {
                fence = None;
            }
            text.push_str(line);
            continue;
        }
        if let Some(marker) = FenceMarker::parse(line) {
            fence = Some(marker);
            text.push_str(line);
            continue;
        }
        let Some(tag) = TagLine::parse(line, index + 1)? else {
            text.push_str(line);
            continue;
        };

        let content = line.trim_start();
        text.push_str(&line[..line.len() - content.len()]);
        let _ = write!(text, "<!--apidocs-tag:{}-->", tags.len());
        if line.ends_with('\n') {
            text.push('\n');
        }
        tags.push(PendingTag {
            tag: Some(tag),
            source: content.trim_end().to_owned(),
        });
    }
    Ok((text, tags))
}

/// Put the original tag text back in place of any placeholder in `text`.
fn restore<'a>(tags: &[PendingTag], text: &'a str) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| tags.get(index))
            .map_or_else(|| caps[0].to_owned(), |pending| pending.source.clone())
    })
}

#[derive(Debug)]
enum TagLine {
    Open(MarkupNode, usize),
    SelfClosing(MarkupNode),
    Close(String, usize),
}

impl TagLine {
    fn parse(line: &str, line_no: usize) -> Result<Option<Self>, MarkupError> {
        let Some(caps) = TAG_LINE.captures(line) else {
            return Ok(None);
        };
        let closing = caps.get(1).is_some();
        let name = caps[2].to_owned();
        let rest = caps[3].trim();
        let self_closing = caps.get(4).is_some();

        if closing {
            if !rest.is_empty() || self_closing {
                return Err(MarkupError::Attribute {
                    line: line_no,
                    message: format!("closing tag `{name}` cannot have attributes"),
                });
            }
            return Ok(Some(Self::Close(name, line_no)));
        }

        let mut node = MarkupNode::tag(name);
        node.attributes = parse_attributes(rest, line_no)?;
        Ok(Some(if self_closing {
            Self::SelfClosing(node)
        } else {
            Self::Open(node, line_no)
        }))
    }
}

/// Opening fence of a fenced code block.
#[derive(Debug, Clone, Copy)]
struct FenceMarker {
    ch: char,
    len: usize,
}

impl FenceMarker {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return None;
        }
        let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == ch).count();
        (len >= 3).then_some(Self { ch, len })
    }

    fn is_closed_by(self, line: &str) -> bool {
        Self::parse(line).is_some_and(|close| {
            close.ch == self.ch
                && close.len >= self.len
                && line.trim_start()[close.len..].trim().is_empty()
        })
    }
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

/// A tag node on the lowerer stack.
struct OpenTag {
    /// Index of the tag node in `Lowerer::stack`.
    depth: usize,
    line: usize,
}

/// Builds markup nodes from a pulldown-cmark event stream.
struct Lowerer {
    stack: Vec<MarkupNode>,
    code: Option<String>,
    table: TableState,
    tags: Vec<PendingTag>,
    open: Vec<OpenTag>,
}

impl Lowerer {
    fn new(tags: Vec<PendingTag>) -> Self {
        Self {
            stack: vec![MarkupNode::node("document")],
            code: None,
            table: TableState::default(),
            tags,
            open: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), MarkupError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag)?,
            Event::Text(text) => {
                if self.code.is_some() {
                    let text = restore(&self.tags, &text).into_owned();
                    if let Some(code) = self.code.as_mut() {
                        code.push_str(&text);
                    }
                } else {
                    self.current().push_text(&text);
                }
            }
            Event::Code(code) => {
                self.attach(MarkupNode::node("code").with_attr("content", code.to_string()));
            }
            Event::Html(html) => self.html_block(&html)?,
            Event::InlineHtml(html) => {
                let text = restore(&self.tags, &html).into_owned();
                self.current().push_text(&text);
            }
            Event::SoftBreak => self.attach(MarkupNode::node("softbreak")),
            Event::HardBreak => self.attach(MarkupNode::node("hardbreak")),
            Event::Rule => self.attach(MarkupNode::node("hr")),
            Event::TaskListMarker(checked) => {
                self.current()
                    .attributes
                    .insert("checked".to_owned(), AttrValue::Bool(checked));
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled
            }
        }
        Ok(())
    }

    /// Raw HTML block: placeholders become tags, anything else stays text.
    fn html_block(&mut self, html: &str) -> Result<(), MarkupError> {
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(html) {
            let Some(marker) = caps.get(0) else {
                continue;
            };
            self.push_html(&html[last..marker.start()]);
            last = marker.end();

            let pending = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.tags.get_mut(index))
                .and_then(|pending| pending.tag.take());
            match pending {
                Some(tag) => self.apply(tag)?,
                None => self.push_html(marker.as_str()),
            }
        }
        self.push_html(&html[last..]);
        Ok(())
    }

    fn push_html(&mut self, html: &str) {
        if !html.trim().is_empty() {
            self.current().push_text(html);
        }
    }

    fn apply(&mut self, tag: TagLine) -> Result<(), MarkupError> {
        match tag {
            TagLine::Open(node, line) => {
                self.open.push(OpenTag {
                    depth: self.stack.len(),
                    line,
                });
                self.stack.push(node);
            }
            TagLine::SelfClosing(node) => self.attach(node),
            TagLine::Close(name, line) => {
                let Some(open) = self.open.last() else {
                    return Err(MarkupError::UnexpectedClose { name, line });
                };
                let opened = open.line;
                if open.depth != self.stack.len() - 1 {
                    return Err(MarkupError::Misnested { name, opened, line });
                }
                let expected = &self.stack[open.depth].name;
                if *expected != name {
                    return Err(MarkupError::MismatchedClose {
                        expected: expected.clone(),
                        found: name,
                        opened,
                        line,
                    });
                }
                self.open.pop();
                if let Some(node) = self.stack.pop() {
                    self.attach(node);
                }
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) {
        let node = match tag {
            Tag::Paragraph => MarkupNode::node("paragraph"),
            Tag::Heading { level, .. } => {
                MarkupNode::node("heading").with_attr("level", i64::from(heading_level_to_num(level)))
            }
            Tag::BlockQuote(_) => MarkupNode::node("blockquote"),
            Tag::CodeBlock(kind) => {
                self.code = Some(String::new());
                match kind {
                    CodeBlockKind::Fenced(info) => fence_node(&info),
                    CodeBlockKind::Indented => MarkupNode::node("fence").with_attr("language", ""),
                }
            }
            Tag::List(start) => {
                let node = MarkupNode::node("list").with_attr("ordered", start.is_some());
                match start {
                    Some(n) if n != 1 => {
                        node.with_attr("start", i64::try_from(n).unwrap_or(i64::MAX))
                    }
                    _ => node,
                }
            }
            Tag::Item => MarkupNode::node("item"),
            Tag::HtmlBlock | Tag::MetadataBlock(_) => return,
            Tag::FootnoteDefinition(label) => {
                MarkupNode::node("footnote").with_attr("label", label.to_string())
            }
            Tag::DefinitionList => MarkupNode::node("dl"),
            Tag::DefinitionListTitle => MarkupNode::node("dt"),
            Tag::DefinitionListDefinition => MarkupNode::node("dd"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                MarkupNode::node("table")
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.stack.push(MarkupNode::node("thead"));
                MarkupNode::node("tr")
            }
            Tag::TableRow => {
                self.table.cell = 0;
                if self.current().name == "table" {
                    self.stack.push(MarkupNode::node("tbody"));
                }
                MarkupNode::node("tr")
            }
            Tag::TableCell => {
                let node = MarkupNode::node(if self.table.in_head { "th" } else { "td" });
                match self.table.alignments.get(self.table.cell) {
                    Some(Alignment::Left) => node.with_attr("align", "left"),
                    Some(Alignment::Center) => node.with_attr("align", "center"),
                    Some(Alignment::Right) => node.with_attr("align", "right"),
                    Some(Alignment::None) | None => node,
                }
            }
            Tag::Emphasis => MarkupNode::node("em"),
            Tag::Strong => MarkupNode::node("strong"),
            Tag::Strikethrough => MarkupNode::node("s"),
            Tag::Superscript => MarkupNode::node("sup"),
            Tag::Subscript => MarkupNode::node("sub"),
            Tag::Link {
                dest_url, title, ..
            } => with_title(
                MarkupNode::node("link").with_attr("href", dest_url.to_string()),
                &title,
            ),
            Tag::Image {
                dest_url, title, ..
            } => with_title(
                MarkupNode::node("image").with_attr("src", dest_url.to_string()),
                &title,
            ),
        };
        self.stack.push(node);
    }

    fn end(&mut self, tag: TagEnd) -> Result<(), MarkupError> {
        match tag {
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::CodeBlock => {
                let content = self.code.take().unwrap_or_default();
                if let Some(fence) = self.pop()? {
                    self.attach(fence.with_attr("content", content));
                }
            }
            TagEnd::Image => {
                // Alt text is the plain text of the image description.
                if let Some(image) = self.pop()? {
                    let alt: String = image.children.iter().map(Markup::text).collect();
                    let image = MarkupNode {
                        children: Vec::new(),
                        ..image
                    };
                    self.attach(image.with_attr("alt", alt));
                }
            }
            TagEnd::TableHead => {
                self.close()?;
                self.close()?;
                self.table.in_head = false;
            }
            TagEnd::TableCell => {
                self.close()?;
                self.table.cell += 1;
            }
            TagEnd::Table => {
                if self.current().name == "tbody" {
                    self.close()?;
                }
                self.close()?;
            }
            _ => self.close()?,
        }
        Ok(())
    }

    fn current(&mut self) -> &mut MarkupNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Pop the innermost markdown node, never the document root.
    ///
    /// A tag still open on top of the stack means its container ended first.
    fn pop(&mut self) -> Result<Option<MarkupNode>, MarkupError> {
        if let Some(open) = self.open.last()
            && open.depth == self.stack.len() - 1
        {
            return Err(MarkupError::UnclosedTag {
                name: self.stack[open.depth].name.clone(),
                line: open.line,
            });
        }
        Ok(if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        })
    }

    fn close(&mut self) -> Result<(), MarkupError> {
        if let Some(node) = self.pop()? {
            self.attach(node);
        }
        Ok(())
    }

    fn attach(&mut self, node: MarkupNode) {
        self.current().push(Markup::Node(node));
    }

    fn finish(mut self) -> Result<Markup, MarkupError> {
        if let Some(open) = self.open.pop() {
            return Err(MarkupError::UnclosedTag {
                name: self.stack[open.depth].name.clone(),
                line: open.line,
            });
        }
        while self.stack.len() > 1 {
            self.close()?;
        }
        let root = self.stack.pop().unwrap_or_else(|| MarkupNode::node("document"));
        Ok(Markup::Node(root))
    }
}

fn with_title(node: MarkupNode, title: &str) -> MarkupNode {
    if title.is_empty() {
        node
    } else {
        node.with_attr("title", title)
    }
}

/// Build a `fence` node from an info string such as `js {% title="Example" %}`.
fn fence_node(info: &str) -> MarkupNode {
    let info = info.trim();
    let (language, rest) = if info.starts_with("{%") {
        ("", info)
    } else {
        let end = info.find(char::is_whitespace).unwrap_or(info.len());
        info.split_at(end)
    };

    let annotation = FENCE_ANNOTATION
        .captures(rest)
        .and_then(|caps| caps.get(1))
        .map_or(rest, |m| m.as_str());

    let node = MarkupNode::node("fence").with_attr("language", language);
    // Info strings are free-form; anything that is not a valid attribute list is ignored.
    match parse_attributes(annotation, 0)
        .ok()
        .and_then(|mut attrs| attrs.remove("title"))
    {
        Some(title @ AttrValue::String(_)) => node.with_attr("title", title),
        _ => node,
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
