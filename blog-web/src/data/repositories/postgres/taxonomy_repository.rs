use async_trait::async_trait;
use sqlx::PgPool;

use super::map_db_error;
use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::domain::error::DomainError;
use crate::domain::taxonomy::{Category, Tag};

#[derive(Debug, Clone)]
pub(crate) struct PostgresTaxonomyRepository {
    pool: PgPool,
}

impl PostgresTaxonomyRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    name: String,
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let row = sqlx::query_as::<_, NamedRow>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_row_to_category(row)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(map_row_to_category).transpose()
    }

    async fn delete_category(&self, id: i64) -> Result<bool, DomainError> {
        // posts, their tag links and comments go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, DomainError> {
        let row = sqlx::query_as::<_, NamedRow>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_row_to_tag(row)
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, DomainError> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(map_row_to_tag).transpose()
    }
}

fn map_row_to_category(row: NamedRow) -> Result<Category, DomainError> {
    Category::new(row.id, row.name).map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_row_to_tag(row: NamedRow) -> Result<Tag, DomainError> {
    Tag::new(row.id, row.name).map_err(|err| DomainError::Unexpected(err.to_string()))
}
