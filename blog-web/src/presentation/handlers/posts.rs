use axum::extract::{Path, State};
use maud::Markup;

use crate::domain::comment::{CommentForm, FieldErrors};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::views;

pub(crate) async fn index(State(state): State<AppState>) -> AppResult<Markup> {
    let posts = state.blog_service.list_all().await?;
    Ok(views::post_list(&posts))
}

/// Each visit bumps the view counter before the page is rendered.
pub(crate) async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Markup> {
    let mut post = state.blog_service.get_post(id).await?;
    state.blog_service.increase_views(&mut post).await?;
    let comments = state.comment_service.list_for_post(post.id).await?;

    Ok(views::post_detail(
        &post,
        &comments,
        &CommentForm::default(),
        &FieldErrors::new(),
    ))
}

pub(crate) async fn archive(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Markup> {
    let posts = state.blog_service.list_by_month(year, month).await?;
    Ok(views::post_list(&posts))
}

pub(crate) async fn category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Markup> {
    let posts = state.blog_service.list_by_category(id).await?;
    Ok(views::post_list(&posts))
}

pub(crate) async fn tag(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Markup> {
    let posts = state.blog_service.list_by_tag(id).await?;
    Ok(views::post_list(&posts))
}
