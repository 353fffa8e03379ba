//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod feed;
mod health;
mod posts;
mod profile;

use actix_web::web;
use serde::Deserialize;

use blogicum_core::domain::User;
use blogicum_core::query::{FeedEntry, FeedPage, Page};
use blogicum_shared::dto::{AuthorRef, CategoryRef, LocationRef, PageMeta, PostResponse, UserResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Feeds and posts
            .route("/posts", web::get().to(feed::index))
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .route("/posts/{post_id}", web::put().to(posts::update))
            .route("/posts/{post_id}", web::delete().to(posts::delete))
            .route("/category/{slug}", web::get().to(feed::category))
            // Profiles
            .route("/profile/{username}", web::get().to(profile::detail))
            .route("/profile", web::put().to(profile::update))
            // Comments
            .route(
                "/posts/{post_id}/comments",
                web::post().to(comments::create),
            )
            .route("/comments/{comment_id}", web::put().to(comments::update))
            .route("/comments/{comment_id}", web::delete().to(comments::delete)),
    );
}

/// `?page=N` - pagination is request-scoped, nothing lives in a session.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<u64>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> Page {
        Page::new(self.page.unwrap_or(1))
    }
}

pub(crate) fn post_response(entry: FeedEntry) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        title: entry.post.title,
        text: entry.post.text,
        pub_date: entry.post.pub_date,
        author: AuthorRef {
            id: entry.author.id,
            username: entry.author.username,
        },
        category: entry.category.map(|c| CategoryRef {
            id: c.id,
            title: c.title,
            slug: c.slug,
        }),
        location: entry.location.map(|l| LocationRef {
            id: l.id,
            name: l.name,
        }),
        image: entry.post.image,
        comment_count: entry.comment_count,
        created_at: entry.post.created_at,
    }
}

pub(crate) fn page_meta(feed: &FeedPage) -> PageMeta {
    PageMeta {
        page: feed.page,
        page_size: feed.page_size,
        total: feed.total,
        total_pages: feed.total_pages(),
    }
}

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        created_at: user.created_at,
    }
}
