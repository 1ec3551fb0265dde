use std::sync::LazyLock;

use maud::{PreEscaped, html};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Renders a code block as `<div class="codehilite"><pre><code>…`, with
/// class-based highlighting when the language is known.
pub(super) fn code_block(lang: Option<&str>, code: &str) -> String {
    let syntax = lang
        .and_then(|lang| SYNTAXES.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());

    let body = match highlight(syntax, code) {
        Ok(body) => body,
        Err(err) => {
            debug!(?lang, error = %err, "highlighting failed, falling back to plain text");
            match highlight(SYNTAXES.find_syntax_plain_text(), code) {
                Ok(body) => body,
                Err(_) => html! { (code) }.into_string(),
            }
        }
    };

    let markup = html! {
        div class="codehilite" {
            pre {
                code class=[lang.map(|lang| format!("language-{lang}"))] {
                    (PreEscaped(body))
                }
            }
        }
    };
    let mut out = markup.into_string();
    out.push('\n');
    out
}

fn highlight(syntax: &SyntaxReference, code: &str) -> Result<String, syntect::Error> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::code_block;

    #[test]
    fn known_language_gets_highlight_spans() {
        let html = code_block(Some("rust"), "fn main() {}\n");

        assert!(html.starts_with(r#"<div class="codehilite"><pre><code class="language-rust">"#));
        assert!(html.contains("<span class="));
    }

    #[test]
    fn unknown_language_is_escaped() {
        let html = code_block(Some("no-such-language"), "<b>&</b>\n");

        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn indented_block_has_no_language_class() {
        let html = code_block(None, "plain\n");

        assert!(html.contains("<pre><code>"));
    }
}
