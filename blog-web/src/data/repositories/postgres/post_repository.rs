use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::map_db_error;
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostParts, PostRecord};
use crate::domain::taxonomy::{Category, Tag};
use crate::domain::user::Author;

const SELECT_POSTS: &str = r#"
    SELECT
        p.id,
        p.title,
        p.body,
        p.excerpt,
        p.created_time,
        p.modified_time,
        p.views,
        c.id AS category_id,
        c.name AS category_name,
        u.id AS author_id,
        u.username AS author_username
    FROM posts p
    JOIN categories c ON c.id = p.category_id
    JOIN users u ON u.id = p.author_id
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_tags(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.name
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            let tag =
                Tag::new(row.id, row.name).map_err(|err| DomainError::Unexpected(err.to_string()))?;
            tags.entry(row.post_id).or_default().push(tag);
        }
        Ok(tags)
    }

    async fn hydrate(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, DomainError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut tags = self.load_tags(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let post_tags = tags.remove(&row.id).unwrap_or_default();
                map_row_to_post(row, post_tags)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    excerpt: String,
    created_time: DateTime<Utc>,
    modified_time: DateTime<Utc>,
    views: i64,
    category_id: i64,
    category_name: String,
    author_id: i64,
    author_username: String,
}

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    id: i64,
    name: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert_post(&self, record: PostRecord) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (
                title, body, excerpt, created_time, modified_time, category_id, author_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&record.title)
        .bind(&record.body)
        .bind(&record.excerpt)
        .bind(record.created_time)
        .bind(record.modified_time)
        .bind(record.category_id)
        .bind(record.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(id)
        .bind(&record.tag_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        self.get_post(id)
            .await?
            .ok_or_else(|| DomainError::Unexpected(format!("post {id} vanished after insert")))
    }

    async fn update_post(&self, id: i64, record: PostRecord) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2,
                body = $3,
                excerpt = $4,
                modified_time = $5,
                category_id = $6,
                author_id = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.body)
        .bind(&record.excerpt)
        .bind(record.modified_time)
        .bind(record.category_id)
        .bind(record.author_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(id)
        .bind(&record.tag_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        self.get_post(id).await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_POSTS);
        query.push(" WHERE p.id = ").push_bind(id);

        let row = query
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_POSTS);
        match filter {
            PostFilter::All => {}
            PostFilter::CreatedBetween { start, end } => {
                query
                    .push(" WHERE p.created_time >= ")
                    .push_bind(start)
                    .push(" AND p.created_time < ")
                    .push_bind(end);
            }
            PostFilter::Category(category_id) => {
                query.push(" WHERE p.category_id = ").push_bind(category_id);
            }
            PostFilter::Tag(tag_id) => {
                query
                    .push(" WHERE EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ")
                    .push_bind(tag_id)
                    .push(")");
            }
        }
        query.push(" ORDER BY p.created_time DESC, p.id DESC");

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.hydrate(rows).await
    }

    async fn update_views(&self, id: i64, views: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET views = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(views)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_row_to_post(row: PostRow, tags: Vec<Tag>) -> Result<Post, DomainError> {
    let category = Category::new(row.category_id, row.category_name)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

    Post::new(PostParts {
        id: row.id,
        title: row.title,
        body: row.body,
        excerpt: row.excerpt,
        created_time: row.created_time,
        modified_time: row.modified_time,
        category,
        tags,
        author: Author {
            id: row.author_id,
            username: row.author_username,
        },
        views: row.views,
    })
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}
