//! Markdown rendering for post bodies.
//!
//! [`render`] produces the full page rendering together with a table of
//! contents; [`excerpt`] produces the short plain-text preview stored on the
//! post row.

mod highlight;
mod toc;

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use toc::{Anchors, TocBuilder};

pub(crate) const EXCERPT_CHARS: usize = 54;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("html tag pattern is valid"));

/// Rendered body of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RichContent {
    pub(crate) html: String,
    /// Inner `<li>` items of the outermost TOC list, empty without headings.
    pub(crate) toc: String,
}

pub(crate) fn render(raw: &str) -> RichContent {
    let mut toc = TocBuilder::default();
    let events = annotate(raw, Some(&mut toc));

    let mut html = String::with_capacity(raw.len() * 2);
    html::push_html(&mut html, events.into_iter());

    RichContent {
        html,
        toc: toc::extract(&toc.finish()),
    }
}

/// Plain-text preview: reduced rendering, tags stripped, hard cut at
/// [`EXCERPT_CHARS`] characters.
pub(crate) fn excerpt(raw: &str) -> String {
    let mut html = String::with_capacity(raw.len() * 2);
    html::push_html(&mut html, annotate(raw, None).into_iter());

    strip_tags(&html).chars().take(EXCERPT_CHARS).collect()
}

pub(crate) fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

struct OpenHeading {
    start: usize,
    level: u8,
    text: String,
}

struct OpenCodeBlock {
    lang: Option<String>,
    code: String,
}

fn explicit_heading_ids(raw: &str) -> Vec<CowStr<'_>> {
    Parser::new_ext(raw, options())
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id, .. }) => id,
            _ => None,
        })
        .collect()
}

/// Replaces code blocks with highlighted HTML and, when a TOC builder is
/// given, assigns heading ids and records every heading.
fn annotate<'a>(raw: &'a str, mut toc: Option<&mut TocBuilder>) -> Vec<Event<'a>> {
    let mut anchors = if toc.is_some() {
        let explicit = explicit_heading_ids(raw);
        Anchors::reserving(explicit.iter().map(|id| id.as_ref()))
    } else {
        Anchors::default()
    };
    let mut events = Vec::new();
    let mut heading: Option<OpenHeading> = None;
    let mut code_block: Option<OpenCodeBlock> = None;

    for event in Parser::new_ext(raw, options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                code_block = Some(OpenCodeBlock {
                    lang,
                    code: String::new(),
                });
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some(block) = code_block.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = code_block.take() {
                    let rendered = highlight::code_block(block.lang.as_deref(), &block.code);
                    events.push(Event::Html(CowStr::from(rendered)));
                }
            }
            Event::Start(Tag::Heading { level, .. }) if toc.is_some() => {
                heading = Some(OpenHeading {
                    start: events.len(),
                    level: level as u8,
                    text: String::new(),
                });
                events.push(event);
            }
            Event::Text(ref text) | Event::Code(ref text) if heading.is_some() => {
                if let Some(open) = heading.as_mut() {
                    open.text.push_str(text);
                }
                events.push(event);
            }
            Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                if let (Some(open), Some(toc)) = (heading.take(), toc.as_deref_mut())
                    && let Some(Event::Start(Tag::Heading { id, .. })) =
                        events.get_mut(open.start)
                {
                    let anchor = match id.as_deref() {
                        Some(explicit) => anchors.keep(explicit),
                        None => anchors.generate(&open.text),
                    };
                    *id = Some(CowStr::from(anchor.clone()));
                    toc.push(open.level, anchor, open.text);
                }
                events.push(event);
            }
            _ => events.push(event),
        }
    }

    events
}
