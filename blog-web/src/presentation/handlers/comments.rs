use axum::{
    Form,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::comment_service::CommentSubmission;
use crate::domain::comment::CommentForm;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::views;

/// Accepted comments answer with `302 Found` back to the post. A form that
/// fails validation is shown again with its errors and `200 OK`.
pub(crate) async fn submit_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let response = match state.comment_service.submit(post_id, form).await? {
        CommentSubmission::Accepted { redirect_to } => {
            (StatusCode::FOUND, [(header::LOCATION, redirect_to)]).into_response()
        }
        CommentSubmission::Rejected { post, form, errors } => {
            views::comment_preview(&post, &form, &errors).into_response()
        }
    };
    Ok(response)
}
