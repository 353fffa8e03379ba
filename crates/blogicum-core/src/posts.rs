//! Post authoring lifecycle: create, edit, delete.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::AccessControl;
use crate::domain::{MAX_TITLE_LEN, NewPost, Post, PostChanges};
use crate::error::DomainError;
use crate::ports::{CategoryStore, LocationStore, PostStore};

#[derive(Clone)]
pub struct Posts {
    posts: Arc<dyn PostStore>,
    categories: Arc<dyn CategoryStore>,
    locations: Arc<dyn LocationStore>,
    access: AccessControl,
}

impl Posts {
    pub fn new(
        posts: Arc<dyn PostStore>,
        categories: Arc<dyn CategoryStore>,
        locations: Arc<dyn LocationStore>,
        access: AccessControl,
    ) -> Self {
        Self {
            posts,
            categories,
            locations,
            access,
        }
    }

    /// Create a post authored by `actor_id`. A future `pub_date` schedules
    /// the publication.
    pub async fn create(&self, actor_id: Uuid, draft: NewPost) -> Result<Post, DomainError> {
        validate_title(&draft.title)?;
        validate_text(&draft.text)?;
        self.check_references(draft.category_id, draft.location_id)
            .await?;

        let post = Post::new(actor_id, draft);
        Ok(self.posts.save(post).await?)
    }

    /// Edit a post; authors only. The `is_published` flag is not settable
    /// here - hiding a post is an administrative capability.
    pub async fn update(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let mut post = self.access.require_post_author(actor_id, post_id).await?;

        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(text) = &changes.text {
            validate_text(text)?;
        }
        self.check_references(
            changes.category_id.flatten(),
            changes.location_id.flatten(),
        )
        .await?;

        post.apply(changes);
        Ok(self.posts.save(post).await?)
    }

    /// Delete a post; authors only. The store cascades to its comments.
    pub async fn delete(&self, actor_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.access.require_post_author(actor_id, post_id).await?;
        Ok(self.posts.delete(post.id).await?)
    }

    /// Referenced category/location must exist; a dangling id in a request
    /// is a validation problem, not a store constraint surprise later.
    async fn check_references(
        &self,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        if let Some(id) = category_id
            && self.categories.find_by_id(id).await?.is_none()
        {
            return Err(DomainError::Validation("unknown category".into()));
        }
        if let Some(id) = location_id
            && self.locations.find_by_id(id).await?.is_none()
        {
            return Err(DomainError::Validation("unknown location".into()));
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "title longer than {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation("text must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("hello").is_ok());
        assert!(validate_title("  ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN)).is_ok());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }
}
