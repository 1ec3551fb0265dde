//! In-memory store backing every repository trait, used by service and
//! handler tests. Mirrors the foreign keys and cascades of the SQL schema.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostParts, PostRecord};
use crate::domain::taxonomy::{Category, Tag};
use crate::domain::user::User;

#[derive(Debug, Clone)]
struct StoredPost {
    record: PostRecord,
    views: i64,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    tags: BTreeMap<i64, Tag>,
    posts: BTreeMap<i64, StoredPost>,
    comments: Vec<Comment>,
    full_post_writes: usize,
    view_writes: Vec<(i64, i64)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_references(&self, record: &PostRecord) -> Result<(), DomainError> {
        if !self.categories.contains_key(&record.category_id) {
            return Err(DomainError::ConstraintViolation(
                "posts_category_id_fkey".to_string(),
            ));
        }
        if !self.users.contains_key(&record.author_id) {
            return Err(DomainError::ConstraintViolation(
                "posts_author_id_fkey".to_string(),
            ));
        }
        if record.tag_ids.iter().any(|id| !self.tags.contains_key(id)) {
            return Err(DomainError::ConstraintViolation(
                "post_tags_tag_id_fkey".to_string(),
            ));
        }
        Ok(())
    }

    fn materialize(&self, id: i64, stored: &StoredPost) -> Result<Post, DomainError> {
        let record = &stored.record;
        let category = self
            .categories
            .get(&record.category_id)
            .cloned()
            .ok_or_else(|| DomainError::Unexpected("dangling category".to_string()))?;
        let author = self
            .users
            .get(&record.author_id)
            .map(User::as_author)
            .ok_or_else(|| DomainError::Unexpected("dangling author".to_string()))?;
        let tags = record
            .tag_ids
            .iter()
            .filter_map(|tag_id| self.tags.get(tag_id).cloned())
            .collect();

        Post::new(PostParts {
            id,
            title: record.title.clone(),
            body: record.body.clone(),
            excerpt: record.excerpt.clone(),
            created_time: record.created_time,
            modified_time: record.modified_time,
            category,
            tags,
            author,
            views: stored.views,
        })
    }

    fn delete_posts_where(&mut self, doomed: impl Fn(&StoredPost) -> bool) {
        let ids: Vec<i64> = self
            .posts
            .iter()
            .filter(|(_, stored)| doomed(stored))
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.posts.remove(id);
        }
        self.comments.retain(|comment| !ids.contains(&comment.post_id));
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    pub(crate) fn full_post_writes(&self) -> usize {
        self.lock().full_post_writes
    }

    pub(crate) fn view_writes(&self) -> Vec<(i64, i64)> {
        self.lock().view_writes.clone()
    }

    pub(crate) fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert_post(&self, record: PostRecord) -> Result<Post, DomainError> {
        let mut state = self.lock();
        state.check_references(&record)?;

        let id = state.next_id();
        let stored = StoredPost { record, views: 0 };
        state.full_post_writes += 1;
        let post = state.materialize(id, &stored)?;
        state.posts.insert(id, stored);
        Ok(post)
    }

    async fn update_post(&self, id: i64, record: PostRecord) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        state.check_references(&record)?;

        let Some(existing) = state.posts.get(&id).cloned() else {
            return Ok(None);
        };
        let stored = StoredPost {
            record: PostRecord {
                created_time: existing.record.created_time,
                ..record
            },
            views: existing.views,
        };
        state.full_post_writes += 1;
        let post = state.materialize(id, &stored)?;
        state.posts.insert(id, stored);
        Ok(Some(post))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.lock();
        state
            .posts
            .get(&id)
            .map(|stored| state.materialize(id, stored))
            .transpose()
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let state = self.lock();
        let mut posts = state
            .posts
            .iter()
            .filter(|(_, stored)| {
                let record = &stored.record;
                match filter {
                    PostFilter::All => true,
                    PostFilter::CreatedBetween { start, end } => {
                        record.created_time >= start && record.created_time < end
                    }
                    PostFilter::Category(category_id) => record.category_id == category_id,
                    PostFilter::Tag(tag_id) => record.tag_ids.contains(&tag_id),
                }
            })
            .map(|(id, stored)| state.materialize(*id, stored))
            .collect::<Result<Vec<_>, _>>()?;

        posts.sort_by(|a, b| {
            b.created_time
                .cmp(&a.created_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    async fn update_views(&self, id: i64, views: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        state.view_writes.push((id, views));
        match state.posts.get_mut(&id) {
            Some(stored) => {
                stored.views = views;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TaxonomyRepository for MemoryStore {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let mut state = self.lock();
        let id = state.next_id();
        let category = Category::new(id, name)?;
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn delete_category(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        state.delete_posts_where(|stored| stored.record.category_id == id);
        Ok(true)
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, DomainError> {
        let mut state = self.lock();
        let id = state.next_id();
        let tag = Tag::new(id, name)?;
        state.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, DomainError> {
        Ok(self.lock().tags.get(&id).cloned())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.contains_key(&input.post_id) {
            return Err(DomainError::ConstraintViolation(
                "comments_post_id_fkey".to_string(),
            ));
        }

        let comment = Comment {
            id: state.next_id(),
            post_id: input.post_id,
            name: input.name,
            email: input.email,
            url: input.url,
            text: input.text,
            created_time: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|user| user.username == input.username || user.email == input.email)
        {
            return Err(DomainError::ConstraintViolation(
                "users_username_key".to_string(),
            ));
        }

        let id = state.next_id();
        let user = User::new(id, input.username, input.email, Utc::now())?;
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}
