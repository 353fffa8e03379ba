//! Access control guard.
//!
//! One capability object combining authorship and visibility checks,
//! passed explicitly into route handlers. Actor identity and the current
//! instant are always explicit parameters - nothing here reads ambient
//! request state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::ports::{CommentStore, PostStore};
use crate::query::FeedEntry;
use crate::visibility::is_visible;

/// True iff the actor authored the resource. No role or staff override.
pub fn can_modify(actor_id: Uuid, author_id: Uuid) -> bool {
    actor_id == author_id
}

#[derive(Clone)]
pub struct AccessControl {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl AccessControl {
    pub fn new(posts: Arc<dyn PostStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { posts, comments }
    }

    /// Resolve a post for the detail view.
    ///
    /// The author always gets their own post, published or not. Anyone else
    /// only gets it if it passes the public-visibility invariant at `as_of`.
    /// A hidden post answers exactly like an absent one, so existence never
    /// leaks.
    pub async fn resolve_owned_or_visible(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<FeedEntry, DomainError> {
        let entry = self
            .posts
            .find_entry(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if actor.is_some_and(|id| can_modify(id, entry.post.author_id))
            || is_visible(&entry.post, entry.category.as_ref(), as_of)
        {
            Ok(entry)
        } else {
            Err(DomainError::not_found("post"))
        }
    }

    /// Guard for post edit/delete. Denial carries the post id so the
    /// boundary redirects to the post's public detail view.
    pub async fn require_post_author(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        if can_modify(actor_id, post.author_id) {
            Ok(post)
        } else {
            Err(DomainError::PermissionDenied { post_id })
        }
    }

    /// Guard for comment edit/delete. Denial redirects to the comment's
    /// parent post.
    pub async fn require_comment_author(
        &self,
        actor_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment"))?;

        if can_modify(actor_id, comment.author_id) {
            Ok(comment)
        } else {
            Err(DomainError::PermissionDenied {
                post_id: comment.post_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_modify_is_author_equality() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(can_modify(a, a));
        assert!(!can_modify(a, b));
    }
}
