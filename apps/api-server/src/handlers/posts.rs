//! Post handlers: detail view and the authoring lifecycle.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::domain::{Comment, NewPost, PostChanges};
use blogicum_shared::dto::{
    AuthorRef, CommentResponse, CreatePostRequest, PostDetailResponse, UpdatePostRequest,
};

use crate::handlers::post_response;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{post_id} - one post with its comments, oldest first.
///
/// Authors reach their own hidden posts; for everyone else a hidden post
/// answers 404 exactly like an absent one.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let entry = state
        .access
        .resolve_owned_or_visible(viewer.user_id(), post_id, Utc::now())
        .await?;
    let comments = state.comments.list_for_post(post_id).await?;
    let comments = comment_responses(&state, comments).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(entry),
        comments,
    }))
}

/// POST /api/posts - create a post authored by the current actor.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(
            identity.user_id,
            NewPost {
                title: req.title,
                text: req.text,
                pub_date: req.pub_date,
                location_id: req.location_id,
                category_id: req.category_id,
                image: req.image,
            },
        )
        .await?;

    let entry = state
        .access
        .resolve_owned_or_visible(Some(identity.user_id), post.id, Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(post_response(entry)))
}

/// PUT /api/posts/{post_id} - edit; authors only. A foreign actor is
/// redirected to the post's public detail view instead of an error page.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .update(
            identity.user_id,
            path.into_inner(),
            PostChanges {
                title: req.title,
                text: req.text,
                pub_date: req.pub_date,
                location_id: req.location_id,
                category_id: req.category_id,
                image: req.image,
            },
        )
        .await?;

    let entry = state
        .access
        .resolve_owned_or_visible(Some(identity.user_id), post.id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(post_response(entry)))
}

/// DELETE /api/posts/{post_id} - delete; authors only. Comments go with it.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Resolve comment author usernames in one batch lookup.
pub(super) async fn comment_responses(
    state: &AppState,
    comments: Vec<Comment>,
) -> AppResult<Vec<CommentResponse>> {
    let author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    let authors: HashMap<Uuid, String> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(comments
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            post_id: c.post_id,
            author: AuthorRef {
                id: c.author_id,
                username: authors.get(&c.author_id).cloned().unwrap_or_default(),
            },
            text: c.text,
            created_at: c.created_at,
        })
        .collect())
}
