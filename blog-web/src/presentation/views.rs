//! Server-rendered pages.

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::domain::comment::{Comment, CommentForm, FieldErrors};
use crate::domain::post::Post;

const SITE_TITLE: &str = "Blog";

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (SITE_TITLE) }
            }
            body {
                header {
                    a href="/" { (SITE_TITLE) }
                }
                main { (content) }
            }
        }
    }
}

fn post_meta(post: &Post) -> Markup {
    html! {
        div.meta {
            a.category href=(post.category.url()) { (post.category.name) }
            " "
            time datetime=(post.created_time.to_rfc3339()) {
                (post.created_time.format("%Y-%m-%d").to_string())
            }
            " "
            span.author { (post.author.username) }
            " "
            span.views { (post.views) " views" }
        }
    }
}

/// Shared by the index, archive, category and tag routes.
pub(crate) fn post_list(posts: &[Post]) -> Markup {
    layout(
        "Posts",
        html! {
            @if posts.is_empty() {
                p.empty { "No posts yet." }
            }
            @for post in posts {
                article.post {
                    h2 {
                        a href=(post.absolute_url()) { (post.title) }
                    }
                    (post_meta(post))
                    p.excerpt { (post.excerpt) "..." }
                    a.more href=(post.absolute_url()) { "Continue reading" }
                }
            }
        },
    )
}

pub(crate) fn post_detail(
    post: &Post,
    comments: &[Comment],
    form: &CommentForm,
    errors: &FieldErrors,
) -> Markup {
    let toc = post.toc();
    layout(
        &post.title,
        html! {
            article.post {
                h1 { (post.title) }
                (post_meta(post))
                @if !toc.is_empty() {
                    nav.toc {
                        ul { (PreEscaped(toc)) }
                    }
                }
                div.body { (PreEscaped(post.body_html())) }
                @if !post.tags.is_empty() {
                    ul.tags {
                        @for tag in &post.tags {
                            li { a href=(tag.url()) { (tag.name) } }
                        }
                    }
                }
            }
            section.comments {
                h3 { "Comments (" (comments.len()) ")" }
                @for comment in comments {
                    div.comment id={ "comment-" (comment.id) } {
                        span.name {
                            @if comment.url.is_empty() {
                                (comment.name)
                            } @else {
                                a href=(comment.url) rel="nofollow" { (comment.name) }
                            }
                        }
                        " "
                        time datetime=(comment.created_time.to_rfc3339()) {
                            (comment.created_time.format("%Y-%m-%d %H:%M").to_string())
                        }
                        p { (comment.text) }
                    }
                }
                (comment_form(post, form, errors))
            }
        },
    )
}

/// Shown instead of the detail page when a submitted comment fails
/// validation. Nothing was stored.
pub(crate) fn comment_preview(post: &Post, form: &CommentForm, errors: &FieldErrors) -> Markup {
    layout(
        &post.title,
        html! {
            p.notice {
                "Your comment on "
                a href=(post.absolute_url()) { (post.title) }
                " was not published. Please fix the errors below."
            }
            (comment_form(post, form, errors))
        },
    )
}

fn comment_form(post: &Post, form: &CommentForm, errors: &FieldErrors) -> Markup {
    html! {
        form.comment-form method="post" action={ "/comments/" (post.id) "/" } {
            (field_errors(errors, "name"))
            label { "Name" input type="text" name="name" value=(form.name) required; }
            (field_errors(errors, "email"))
            label { "Email" input type="email" name="email" value=(form.email) required; }
            (field_errors(errors, "url"))
            label { "Website" input type="url" name="url" value=(form.url); }
            (field_errors(errors, "text"))
            label { "Comment" textarea name="text" rows="6" { (form.text) } }
            button type="submit" { "Publish" }
        }
    }
}

fn field_errors(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(messages) = errors.get(field) {
            ul.errors data-field=(field) {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}

pub(crate) fn error_page(status: StatusCode, message: &str) -> Markup {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        html! {
            h1 { (status.as_u16()) " " (reason) }
            p { (message) }
        },
    )
}
