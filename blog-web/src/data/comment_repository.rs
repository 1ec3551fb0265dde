use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) url: String,
    pub(crate) text: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    /// Oldest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
}

#[async_trait]
impl<T: CommentRepository + ?Sized> CommentRepository for Arc<T> {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        (**self).create_comment(input).await
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        (**self).list_comments(post_id).await
    }
}
