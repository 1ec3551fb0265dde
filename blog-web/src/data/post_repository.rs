use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostRecord};

/// Selection applied by [`PostRepository::list_posts`]. Every variant is
/// ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostFilter {
    All,
    /// `start <= created_time < end`.
    CreatedBetween {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Category(i64),
    Tag(i64),
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn insert_post(&self, record: PostRecord) -> Result<Post, DomainError>;
    /// Rewrites every editable column except `created_time`.
    async fn update_post(&self, id: i64, record: PostRecord) -> Result<Option<Post>, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError>;
    /// Writes the `views` column only.
    async fn update_views(&self, id: i64, views: i64) -> Result<bool, DomainError>;
}

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn insert_post(&self, record: PostRecord) -> Result<Post, DomainError> {
        (**self).insert_post(record).await
    }

    async fn update_post(&self, id: i64, record: PostRecord) -> Result<Option<Post>, DomainError> {
        (**self).update_post(id, record).await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        (**self).get_post(id).await
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        (**self).list_posts(filter).await
    }

    async fn update_views(&self, id: i64, views: i64) -> Result<bool, DomainError> {
        (**self).update_views(id, views).await
    }
}
