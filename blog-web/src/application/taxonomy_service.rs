use tracing::info;

use crate::data::taxonomy_repository::TaxonomyRepository;
use crate::domain::error::DomainError;
use crate::domain::taxonomy::{Category, Tag, normalize_name};

pub(crate) struct TaxonomyService<T: TaxonomyRepository> {
    repo: T,
}

impl<T: TaxonomyRepository> TaxonomyService<T> {
    pub(crate) fn new(repo: T) -> Self {
        Self { repo }
    }

    pub(crate) async fn add_category(&self, name: &str) -> Result<Category, DomainError> {
        let name = normalize_name("name", name)?;
        let category = self.repo.create_category(&name).await?;
        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Removes the category and, with it, every post filed under it.
    pub(crate) async fn delete_category(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete_category(id).await? {
            return Err(DomainError::NotFound(format!("category id: {id}")));
        }
        info!(category_id = id, "category deleted");
        Ok(())
    }

    pub(crate) async fn add_tag(&self, name: &str) -> Result<Tag, DomainError> {
        let name = normalize_name("name", name)?;
        let tag = self.repo.create_tag(&name).await?;
        info!(tag_id = tag.id, name = %tag.name, "tag created");
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::TaxonomyService;
    use crate::application::blog_service::BlogService;
    use crate::application::blog_service::tests::{draft_at, seeded};
    use crate::data::repositories::memory::MemoryStore;
    use crate::domain::error::DomainError;

    #[tokio::test]
    async fn add_category_trims_name() {
        let service = TaxonomyService::new(MemoryStore::default());

        let category = service
            .add_category("  Rust notes ")
            .await
            .expect("category must be created");

        assert_eq!(category.name, "Rust notes");
    }

    #[tokio::test]
    async fn add_tag_rejects_blank_name() {
        let service = TaxonomyService::new(MemoryStore::default());

        let err = service.add_tag("   ").await.expect_err("blank must fail");

        assert!(matches!(err, DomainError::Validation { field: "name", .. }));
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let service = TaxonomyService::new(MemoryStore::default());

        let err = service
            .delete_category(5)
            .await
            .expect_err("category must be missing");

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_category_cascades_to_posts() {
        let seed = seeded().await;
        let blog = BlogService::new(seed.store.clone(), seed.store.clone());
        let post = blog
            .create_post(draft_at(&seed, "filed", Utc::now()))
            .await
            .expect("post must be created");

        TaxonomyService::new(seed.store.clone())
            .delete_category(seed.category_id)
            .await
            .expect("delete must succeed");

        assert!(blog.list_all().await.expect("must list").is_empty());
        assert!(matches!(
            blog.get_post(post.id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
