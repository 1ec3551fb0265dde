use std::collections::HashSet;
use std::sync::LazyLock;

use maud::{Markup, html};
use regex::Regex;

static TOC_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="toc">\s*<ul>(.*)</ul>\s*</div>"#)
        .expect("toc wrapper pattern is valid")
});

/// Hands out unique heading ids within one document.
#[derive(Debug, Default)]
pub(super) struct Anchors {
    used: HashSet<String>,
}

impl Anchors {
    /// Starts with every explicit id of the document already taken, so a
    /// generated slug never reuses one that appears further down.
    pub(super) fn reserving<'a>(explicit: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: explicit.into_iter().map(str::to_string).collect(),
        }
    }

    pub(super) fn keep(&mut self, explicit: &str) -> String {
        self.used.insert(explicit.to_string());
        explicit.to_string()
    }

    pub(super) fn generate(&mut self, heading_text: &str) -> String {
        let base = slug::slugify(heading_text);
        let mut candidate = base.clone();
        let mut counter = 0;
        while candidate.is_empty() || self.used.contains(&candidate) {
            counter += 1;
            candidate = format!("{base}_{counter}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

#[derive(Debug, Clone)]
struct Heading {
    level: u8,
    anchor: String,
    title: String,
}

#[derive(Debug)]
struct TocNode<'a> {
    heading: &'a Heading,
    children: Vec<TocNode<'a>>,
}

#[derive(Debug, Default)]
pub(super) struct TocBuilder {
    headings: Vec<Heading>,
}

impl TocBuilder {
    pub(super) fn push(&mut self, level: u8, anchor: String, title: String) {
        self.headings.push(Heading {
            level,
            anchor,
            title: title.trim().to_string(),
        });
    }

    /// Wrapped TOC document: `<div class="toc"><ul>…</ul></div>`.
    pub(super) fn finish(&self) -> String {
        let nodes = nest(&self.headings);
        html! {
            div class="toc" {
                @if !nodes.is_empty() {
                    (render_list(&nodes))
                }
            }
        }
        .into_string()
    }
}

/// Inner content of the outermost TOC list, or an empty string when the
/// document had no headings.
pub(super) fn extract(wrapped: &str) -> String {
    TOC_WRAPPER
        .captures(wrapped)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

// A heading owns every following heading that is strictly deeper than it.
fn nest(headings: &[Heading]) -> Vec<TocNode<'_>> {
    let mut nodes = Vec::new();
    let mut i = 0;
    while i < headings.len() {
        let level = headings[i].level;
        let mut end = i + 1;
        while end < headings.len() && headings[end].level > level {
            end += 1;
        }
        nodes.push(TocNode {
            heading: &headings[i],
            children: nest(&headings[i + 1..end]),
        });
        i = end;
    }
    nodes
}

fn render_list(nodes: &[TocNode<'_>]) -> Markup {
    html! {
        ul {
            @for node in nodes {
                li {
                    a href={ "#" (node.heading.anchor) } { (node.heading.title) }
                    @if !node.children.is_empty() {
                        (render_list(&node.children))
                    }
                }
            }
        }
    }
}
