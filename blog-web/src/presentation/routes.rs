use axum::Router;
use axum::routing::{get, post};

use super::AppState;
use super::handlers::{comments, health, posts};

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::index))
        .route("/posts/{id}/", get(posts::detail))
        .route("/archives/{year}/{month}/", get(posts::archive))
        .route("/categories/{id}/", get(posts::category))
        .route("/tags/{id}/", get(posts::tag))
        .route("/comments/{post_id}/", post(comments::submit_comment))
        .route("/healthz", get(health::healthz))
        .with_state(state)
}
