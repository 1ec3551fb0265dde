use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostDraft};

pub(crate) struct BlogService<P: PostRepository, T: TaxonomyRepository> {
    posts: P,
    taxonomy: T,
}

impl<P: PostRepository, T: TaxonomyRepository> BlogService<P, T> {
    pub(crate) fn new(posts: P, taxonomy: T) -> Self {
        Self { posts, taxonomy }
    }

    pub(crate) async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list_posts(PostFilter::All).await
    }

    /// Posts created in the given calendar month (UTC).
    pub(crate) async fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<Post>, DomainError> {
        let filter = month_filter(year, month)
            .ok_or_else(|| DomainError::NotFound(format!("archive {year}-{month:02}")))?;
        self.posts.list_posts(filter).await
    }

    pub(crate) async fn list_by_category(&self, category_id: i64) -> Result<Vec<Post>, DomainError> {
        self.taxonomy
            .get_category(category_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category id: {category_id}")))?;
        self.posts.list_posts(PostFilter::Category(category_id)).await
    }

    pub(crate) async fn list_by_tag(&self, tag_id: i64) -> Result<Vec<Post>, DomainError> {
        self.taxonomy
            .get_tag(tag_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("tag id: {tag_id}")))?;
        self.posts.list_posts(PostFilter::Tag(tag_id)).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    /// Bumps the in-memory counter and writes back only `views`. Two
    /// concurrent visits may both write the same value.
    pub(crate) async fn increase_views(&self, post: &mut Post) -> Result<(), DomainError> {
        post.views += 1;
        let updated = self.posts.update_views(post.id, post.views).await?;
        if !updated {
            return Err(DomainError::NotFound(format!("post id: {}", post.id)));
        }
        debug!(post_id = post.id, views = post.views, "views increased");
        Ok(())
    }

    pub(crate) async fn create_post(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let record = draft.validate()?.into_record(Utc::now());
        let post = self.posts.insert_post(record).await?;
        info!(post_id = post.id, title = %post.title, "post created");
        Ok(post)
    }

    pub(crate) async fn update_post(&self, id: i64, draft: PostDraft) -> Result<Post, DomainError> {
        let record = draft.validate()?.into_record(Utc::now());
        let post = self
            .posts
            .update_post(id, record)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))?;
        info!(post_id = post.id, "post updated");
        Ok(post)
    }
}

fn month_filter(year: i32, month: u32) -> Option<PostFilter> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;

    Some(PostFilter::CreatedBetween {
        start: start.and_hms_opt(0, 0, 0)?.and_utc(),
        end: end.and_hms_opt(0, 0, 0)?.and_utc(),
    })
}
