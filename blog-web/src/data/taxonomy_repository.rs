use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::taxonomy::{Category, Tag};

#[async_trait]
pub(crate) trait TaxonomyRepository: Send + Sync {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError>;
    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError>;
    /// Deletes the category together with its posts.
    async fn delete_category(&self, id: i64) -> Result<bool, DomainError>;
    async fn create_tag(&self, name: &str) -> Result<Tag, DomainError>;
    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, DomainError>;
}

#[async_trait]
impl<T: TaxonomyRepository + ?Sized> TaxonomyRepository for Arc<T> {
    async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        (**self).create_category(name).await
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, DomainError> {
        (**self).get_category(id).await
    }

    async fn delete_category(&self, id: i64) -> Result<bool, DomainError> {
        (**self).delete_category(id).await
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, DomainError> {
        (**self).create_tag(name).await
    }

    async fn get_tag(&self, id: i64) -> Result<Option<Tag>, DomainError> {
        (**self).get_tag(id).await
    }
}
