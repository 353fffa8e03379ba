//! Public listing handlers: the global feed and category feeds.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_shared::dto::{CategoryFeedResponse, CategoryResponse, FeedResponse};

use crate::handlers::{PageQuery, page_meta, post_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts - the global feed of publicly visible posts.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.feeds.global(Utc::now(), query.page()).await?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        meta: page_meta(&feed),
        posts: feed.entries.into_iter().map(post_response).collect(),
    }))
}

/// GET /api/category/{slug} - one visible category's feed.
///
/// An unpublished category answers 404, exactly like an absent one.
pub async fn category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let (category, feed) = state.feeds.category(&slug, Utc::now(), query.page()).await?;

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: CategoryResponse {
            id: category.id,
            title: category.title,
            description: category.description,
            slug: category.slug,
        },
        meta: page_meta(&feed),
        posts: feed.entries.into_iter().map(post_response).collect(),
    }))
}
