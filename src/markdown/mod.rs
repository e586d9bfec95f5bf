//! Markdown rendering for AI analysis reports and test output.
//!
//! This module provides:
//! - `render_markdown()`: Markdown to HTML with a fixed feature set
//! - `render_markdown_text()`: the same, stripped down to plain text
//! - `MarkdownRenderer`: the renderer behind both, generic over its formatter
//!
//! Uses pulldown-cmark for parsing. Falls back to the original text if
//! rendering fails.

mod linkify;
mod text;

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;
use tracing::error;

pub use linkify::{LinkSegment, split_links};
pub use text::{decode_entities, html_to_text};

static HTML_LINK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<a[>\s]").expect("link open pattern is valid"));
static HTML_LINK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</a\s*>").expect("link close pattern is valid"));

/// Renderer used by the module-level functions.
static DEFAULT_RENDERER: LazyLock<MarkdownRenderer> = LazyLock::new(MarkdownRenderer::default);

/// Render Markdown to HTML with the default renderer.
pub fn render_markdown(content: &str) -> String {
    DEFAULT_RENDERER.render_markdown(content)
}

/// Render Markdown to plain text with the default renderer.
pub fn render_markdown_text(content: &str) -> String {
    DEFAULT_RENDERER.render_markdown_text(content)
}

/// Rendering errors. Never surfaced past [`MarkdownRenderer`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Formatter error: {0}")]
    Formatter(String),

    #[error("Formatter panicked: {0}")]
    Panicked(String),
}

/// Feature switches for the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Pass raw HTML through instead of escaping it
    pub html: bool,
    /// Turn bare URLs into links
    pub linkify: bool,
    /// Smart quotes, dashes and ellipses
    pub typographer: bool,
    /// Render single newlines as `<br />`
    pub breaks: bool,
}

impl MarkdownOptions {
    /// The feature set used for every render.
    pub const FIXED: MarkdownOptions = MarkdownOptions {
        html: true,
        linkify: true,
        typographer: true,
        breaks: true,
    };

    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        if self.typographer {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Something that turns Markdown into HTML.
pub trait MarkdownFormatter {
    fn render(&self, content: &str) -> Result<String, RenderError>;
}

/// pulldown-cmark based formatter.
#[derive(Debug, Clone, Default)]
pub struct CmarkFormatter {
    options: MarkdownOptions,
}

impl CmarkFormatter {
    pub fn new(options: MarkdownOptions) -> Self {
        CmarkFormatter { options }
    }

    pub fn options(&self) -> MarkdownOptions {
        self.options
    }

    fn transform<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut link_depth = 0usize;
        let mut in_code_block = false;

        for event in TextMergeStream::new(parser) {
            match event {
                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    link_depth += 1;
                    events.push(Event::Start(tag));
                }
                Event::End(tag @ (TagEnd::Link | TagEnd::Image)) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(Event::End(tag));
                }
                Event::Start(tag @ Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    events.push(Event::Start(tag));
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(Event::End(TagEnd::CodeBlock));
                }
                Event::Text(text) if self.options.linkify && link_depth == 0 && !in_code_block => {
                    push_linkified(&mut events, text);
                }
                Event::SoftBreak if self.options.breaks => events.push(Event::HardBreak),
                Event::Html(html) | Event::InlineHtml(html) if !self.options.html => {
                    events.push(Event::Text(html));
                }
                Event::InlineHtml(html) => {
                    if HTML_LINK_OPEN.is_match(&html) {
                        link_depth += 1;
                    } else if HTML_LINK_CLOSE.is_match(&html) {
                        link_depth = link_depth.saturating_sub(1);
                    }
                    events.push(Event::InlineHtml(html));
                }
                other => events.push(other),
            }
        }

        events
    }
}

impl MarkdownFormatter for CmarkFormatter {
    fn render(&self, content: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(content, self.options.parser_options());
        let events = self.transform(parser);

        let mut html = String::with_capacity(content.len() + content.len() / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Ok(html)
    }
}

fn push_linkified<'a>(events: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    let segments = split_links(&text);
    if !segments.iter().any(|s| matches!(s, LinkSegment::Link { .. })) {
        drop(segments);
        events.push(Event::Text(text));
        return;
    }

    for segment in segments {
        match segment {
            LinkSegment::Text(plain) => events.push(Event::Text(plain.to_string().into())),
            LinkSegment::Link { href, text } => {
                events.push(Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url: href.into(),
                    title: CowStr::Borrowed(""),
                    id: CowStr::Borrowed(""),
                }));
                events.push(Event::Text(text.to_string().into()));
                events.push(Event::End(TagEnd::Link));
            }
        }
    }
}

/// Markdown renderer that never fails.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer<F = CmarkFormatter> {
    formatter: F,
}

impl<F: MarkdownFormatter> MarkdownRenderer<F> {
    pub fn new(formatter: F) -> Self {
        MarkdownRenderer { formatter }
    }

    /// Render `content` to HTML.
    ///
    /// If the formatter fails or panics, the error is logged and `content`
    /// is returned unchanged.
    pub fn render_markdown(&self, content: &str) -> String {
        let result = catch_unwind(AssertUnwindSafe(|| self.formatter.render(content)))
            .unwrap_or_else(|panic| Err(RenderError::Panicked(panic_message(panic.as_ref()))));

        match result {
            Ok(html) => html,
            Err(e) => {
                error!("Markdown rendering failed: {}", e);
                content.to_string()
            }
        }
    }

    /// Render `content` and strip the markup, leaving plain text.
    pub fn render_markdown_text(&self, content: &str) -> String {
        html_to_text(&self.render_markdown(content))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
