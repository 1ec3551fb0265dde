use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::taxonomy::{Category, Tag, validate_id};
use super::user::Author;
use crate::markup::{self, RichContent};

const TITLE_MAX_CHARS: usize = 70;

#[derive(Debug)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    body: String,
    pub(crate) excerpt: String,
    pub(crate) created_time: DateTime<Utc>,
    pub(crate) modified_time: DateTime<Utc>,
    pub(crate) category: Category,
    pub(crate) tags: Vec<Tag>,
    pub(crate) author: Author,
    pub(crate) views: i64,
    rich_content: OnceLock<RichContent>,
}

/// Stored columns of a post, as loaded by a repository.
#[derive(Debug, Clone)]
pub(crate) struct PostParts {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) excerpt: String,
    pub(crate) created_time: DateTime<Utc>,
    pub(crate) modified_time: DateTime<Utc>,
    pub(crate) category: Category,
    pub(crate) tags: Vec<Tag>,
    pub(crate) author: Author,
    pub(crate) views: i64,
}

impl Post {
    pub(crate) fn new(parts: PostParts) -> Result<Self, DomainError> {
        validate_id("id", parts.id)?;
        if parts.views < 0 {
            return Err(DomainError::Validation {
                field: "views",
                message: "must be >= 0",
            });
        }

        Ok(Self {
            id: parts.id,
            title: parts.title,
            body: parts.body,
            excerpt: parts.excerpt,
            created_time: parts.created_time,
            modified_time: parts.modified_time,
            category: parts.category,
            tags: parts.tags,
            author: parts.author,
            views: parts.views,
            rich_content: OnceLock::new(),
        })
    }

    pub(crate) fn body(&self) -> &str {
        &self.body
    }

    /// Rendered body, computed on first access and kept for the lifetime of
    /// this instance.
    pub(crate) fn rich_content(&self) -> &RichContent {
        self.rich_content.get_or_init(|| markup::render(&self.body))
    }

    pub(crate) fn body_html(&self) -> &str {
        &self.rich_content().html
    }

    pub(crate) fn toc(&self) -> &str {
        &self.rich_content().toc
    }

    pub(crate) fn absolute_url(&self) -> String {
        format!("/posts/{}/", self.id)
    }

    #[cfg(test)]
    pub(crate) fn is_rendered(&self) -> bool {
        self.rich_content.get().is_some()
    }
}

// A clone is a new instance: it starts without a cached rendering.
impl Clone for Post {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            title: self.title.clone(),
            body: self.body.clone(),
            excerpt: self.excerpt.clone(),
            created_time: self.created_time,
            modified_time: self.modified_time,
            category: self.category.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            views: self.views,
            rich_content: OnceLock::new(),
        }
    }
}

/// Editable fields of a post, as submitted by a writer.
#[derive(Debug, Clone)]
pub(crate) struct PostDraft {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) category_id: i64,
    pub(crate) tag_ids: Vec<i64>,
    pub(crate) author_id: i64,
    /// Creation instant for back-dated inserts; ignored on update.
    pub(crate) created_time: Option<DateTime<Utc>>,
}

/// What gets written on every save: the draft plus its derived fields.
#[derive(Debug, Clone)]
pub(crate) struct PostRecord {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) excerpt: String,
    pub(crate) category_id: i64,
    pub(crate) tag_ids: Vec<i64>,
    pub(crate) author_id: i64,
    pub(crate) created_time: DateTime<Utc>,
    pub(crate) modified_time: DateTime<Utc>,
}

impl PostDraft {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_id("category_id", self.category_id)?;
        validate_id("author_id", self.author_id)?;
        for tag_id in &self.tag_ids {
            validate_id("tag_ids", *tag_id)?;
        }

        let mut tag_ids = self.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        Ok(Self {
            title: normalize_title(&self.title)?,
            body: normalize_body(self.body)?,
            tag_ids,
            ..self
        })
    }

    /// Stamps the save: `modified_time` is always `now`, the excerpt is
    /// recomputed from the body.
    pub(crate) fn into_record(self, now: DateTime<Utc>) -> PostRecord {
        PostRecord {
            excerpt: markup::excerpt(&self.body),
            title: self.title,
            body: self.body,
            category_id: self.category_id,
            tag_ids: self.tag_ids,
            author_id: self.author_id,
            created_time: self.created_time.unwrap_or(now),
            modified_time: now,
        }
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    let len = title.chars().count();
    if len == 0 || len > TITLE_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..70 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_body(body: String) -> Result<String, DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "body",
            message: "must not be empty",
        });
    }
    Ok(body)
}
