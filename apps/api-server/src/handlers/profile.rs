//! Profile handlers: an author's feed and own-profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::domain::ProfileChanges;
use blogicum_shared::dto::{ProfileResponse, UpdateProfileRequest};

use crate::handlers::{PageQuery, page_meta, post_response, user_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profile/{username} - an author's posts.
///
/// Owners see everything they wrote, scheduled and hidden posts included;
/// every other viewer gets only the publicly visible subset.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let (user, feed) = state
        .feeds
        .author(&username, viewer.user_id(), Utc::now(), query.page())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: user_response(user),
        meta: page_meta(&feed),
        posts: feed.entries.into_iter().map(post_response).collect(),
    }))
}

/// PUT /api/profile - update one's own profile fields.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(username) = &req.username {
        if username.trim().is_empty() {
            return Err(AppError::BadRequest("Username must not be empty".to_string()));
        }
        if let Some(taken) = state.users.find_by_username(username).await?
            && taken.id != identity.user_id
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
    }
    if let Some(email) = &req.email
        && (email.is_empty() || !email.contains('@'))
    {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    user.apply(ProfileChanges {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    });
    let saved = state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(user_response(saved)))
}
