use tracing::{info, warn};
use validator::Validate;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentForm, FieldErrors, field_errors};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Result of a comment submission that reached a post.
#[derive(Debug)]
pub(crate) enum CommentSubmission {
    /// Comment stored; the client goes back to the post page.
    Accepted { redirect_to: String },
    /// Nothing stored; the form is shown again with its errors.
    Rejected {
        post: Box<Post>,
        form: CommentForm,
        errors: FieldErrors,
    },
}

pub(crate) struct CommentService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> CommentService<P, C> {
    pub(crate) fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn submit(
        &self,
        post_id: i64,
        form: CommentForm,
    ) -> Result<CommentSubmission, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        let form = form.normalized();
        if let Err(errors) = form.validate() {
            let errors = field_errors(&errors);
            warn!(post_id, fields = ?errors.keys().collect::<Vec<_>>(), "comment rejected");
            return Ok(CommentSubmission::Rejected {
                post: Box::new(post),
                form,
                errors,
            });
        }

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id: post.id,
                name: form.name,
                email: form.email,
                url: form.url,
                text: form.text,
            })
            .await?;
        info!(post_id, comment_id = comment.id, "comment published");

        Ok(CommentSubmission::Accepted {
            redirect_to: post.absolute_url(),
        })
    }

    pub(crate) async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        self.comments.list_comments(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CommentService, CommentSubmission};
    use crate::application::blog_service::BlogService;
    use crate::application::blog_service::tests::{Seeded, draft_at, seeded};
    use crate::domain::comment::CommentForm;
    use crate::domain::error::DomainError;

    fn form(text: &str) -> CommentForm {
        CommentForm {
            name: "reader".to_string(),
            email: "reader@example.com".to_string(),
            url: "https://reader.example.com".to_string(),
            text: text.to_string(),
        }
    }

    async fn post_id(seed: &Seeded) -> i64 {
        BlogService::new(seed.store.clone(), seed.store.clone())
            .create_post(draft_at(seed, "commented", Utc::now()))
            .await
            .expect("post must be created")
            .id
    }

    #[tokio::test]
    async fn valid_comment_is_stored_and_redirects_to_post() {
        let seed = seeded().await;
        let id = post_id(&seed).await;
        let service = CommentService::new(seed.store.clone(), seed.store.clone());

        let outcome = service
            .submit(id, form("  great read  "))
            .await
            .expect("submit must succeed");

        match outcome {
            CommentSubmission::Accepted { redirect_to } => {
                assert_eq!(redirect_to, format!("/posts/{id}/"));
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
        let comments = service.list_for_post(id).await.expect("must list");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "great read");
        assert_eq!(comments[0].post_id, id);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_storing() {
        let seed = seeded().await;
        let id = post_id(&seed).await;
        let service = CommentService::new(seed.store.clone(), seed.store.clone());

        let outcome = service
            .submit(id, form(""))
            .await
            .expect("submit must not error");

        match outcome {
            CommentSubmission::Rejected { post, form, errors } => {
                assert_eq!(post.id, id);
                assert_eq!(form.name, "reader");
                assert!(errors.contains_key("text"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(seed.store.comment_count(), 0);
    }

    #[tokio::test]
    async fn submit_to_missing_post_is_not_found() {
        let seed = seeded().await;
        let service = CommentService::new(seed.store.clone(), seed.store.clone());

        let err = service
            .submit(12_345, form("hello"))
            .await
            .expect_err("post must be missing");

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(seed.store.comment_count(), 0);
    }
}
