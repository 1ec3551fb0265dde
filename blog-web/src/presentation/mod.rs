use std::sync::Arc;

use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::taxonomy_repository::TaxonomyRepository;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod routes;
pub(crate) mod views;

pub(crate) type DynPostRepository = Arc<dyn PostRepository>;
pub(crate) type DynTaxonomyRepository = Arc<dyn TaxonomyRepository>;
pub(crate) type DynCommentRepository = Arc<dyn CommentRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) blog_service: Arc<BlogService<DynPostRepository, DynTaxonomyRepository>>,
    pub(crate) comment_service: Arc<CommentService<DynPostRepository, DynCommentRepository>>,
}

impl AppState {
    pub(crate) fn new(
        posts: DynPostRepository,
        taxonomy: DynTaxonomyRepository,
        comments: DynCommentRepository,
    ) -> Self {
        Self {
            blog_service: Arc::new(BlogService::new(posts.clone(), taxonomy)),
            comment_service: Arc::new(CommentService::new(posts, comments)),
        }
    }
}
