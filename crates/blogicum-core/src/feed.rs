//! Feed assembly.
//!
//! The three public listings, all built on the visibility rules: the global
//! feed, one category's feed, and one author's profile feed. Pagination is
//! fixed at ten posts per page and comment counts are annotated by the
//! store in one aggregate per page.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, User};
use crate::error::DomainError;
use crate::ports::{CategoryStore, PostStore, UserStore};
use crate::query::{FeedPage, Page, PostQuery};
use crate::visibility::{author_public_query, category_query, visible_query};

#[derive(Clone)]
pub struct Feeds {
    posts: Arc<dyn PostStore>,
    categories: Arc<dyn CategoryStore>,
    users: Arc<dyn UserStore>,
}

impl Feeds {
    pub fn new(
        posts: Arc<dyn PostStore>,
        categories: Arc<dyn CategoryStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    /// The global feed: every publicly visible post as of `as_of`.
    pub async fn global(&self, as_of: DateTime<Utc>, page: Page) -> Result<FeedPage, DomainError> {
        Ok(self.posts.query(&visible_query(as_of, page)).await?)
    }

    /// Resolve a category for public browsing.
    ///
    /// Unpublished categories behave as if they do not exist: an absent slug
    /// and an unpublished one both answer not-found.
    pub async fn resolve_visible_category(&self, slug: &str) -> Result<Category, DomainError> {
        match self.categories.find_by_slug(slug).await? {
            Some(category) if category.is_published => Ok(category),
            _ => Err(DomainError::not_found("category")),
        }
    }

    /// One visible category's feed of visible posts.
    pub async fn category(
        &self,
        slug: &str,
        as_of: DateTime<Utc>,
        page: Page,
    ) -> Result<(Category, FeedPage), DomainError> {
        let category = self.resolve_visible_category(slug).await?;
        let feed = self
            .posts
            .query(&category_query(category.id, as_of, page))
            .await?;
        Ok((category, feed))
    }

    /// One author's profile feed.
    ///
    /// Owners see all of their posts - scheduled, unpublished and
    /// hidden-category ones included. Everyone else sees only what the
    /// public-visibility invariant allows, the same rule the detail view
    /// applies.
    pub async fn author(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        as_of: DateTime<Utc>,
        page: Page,
    ) -> Result<(User, FeedPage), DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let query = if viewer == Some(user.id) {
            PostQuery::by_author(user.id, page)
        } else {
            author_public_query(user.id, as_of, page)
        };

        let feed = self.posts.query(&query).await?;
        Ok((user, feed))
    }
}
