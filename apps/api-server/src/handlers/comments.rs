//! Comment handlers.
//!
//! Success and denial on the mutating routes both resolve back to the
//! parent post's detail view; the error middleware turns a denial into a
//! 303 redirect there.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use blogicum_shared::dto::CommentRequest;

use crate::handlers::posts::comment_responses;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments - comment on an existing post.
///
/// Existence is the only check: scheduled or hidden posts accept comments
/// through a direct link.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(identity.user_id, path.into_inner(), body.into_inner().text)
        .await?;

    let response = comment_responses(&state, vec![comment]).await?.remove(0);
    Ok(HttpResponse::Created().json(response))
}

/// PUT /api/comments/{comment_id} - edit own comment.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .update(identity.user_id, path.into_inner(), body.into_inner().text)
        .await?;

    let response = comment_responses(&state, vec![comment]).await?.remove(0);
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/comments/{comment_id} - delete own comment, then resolve to
/// the parent post's detail view.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = state
        .comments
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/api/posts/{post_id}")))
        .finish())
}
