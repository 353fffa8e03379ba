//! Comment lifecycle: absent -> created -> editable-by-author -> deleted.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::AccessControl;
use crate::domain::Comment;
use crate::error::DomainError;
use crate::ports::{CommentStore, PostStore};

#[derive(Clone)]
pub struct Comments {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    access: AccessControl,
}

impl Comments {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        access: AccessControl,
    ) -> Self {
        Self {
            posts,
            comments,
            access,
        }
    }

    /// Create a comment on an existing post.
    ///
    /// The target only has to exist, not to be visible: a direct link to a
    /// scheduled or hidden post accepts comments.
    pub async fn create(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        validate_text(&text)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        let comment = Comment::new(post.id, actor_id, text);
        Ok(self.comments.save(comment).await?)
    }

    /// Edit a comment's text; authors only. `created_at` never changes.
    pub async fn update(
        &self,
        actor_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Comment, DomainError> {
        validate_text(&text)?;

        let mut comment = self
            .access
            .require_comment_author(actor_id, comment_id)
            .await?;
        comment.text = text;
        Ok(self.comments.save(comment).await?)
    }

    /// Delete a comment; authors only. Returns the parent post id so the
    /// caller can resolve back to its detail view.
    pub async fn delete(&self, actor_id: Uuid, comment_id: Uuid) -> Result<Uuid, DomainError> {
        let comment = self
            .access
            .require_comment_author(actor_id, comment_id)
            .await?;
        self.comments.delete(comment.id).await?;
        Ok(comment.post_id)
    }

    /// All comments of a post, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_for_post(post_id).await?)
    }
}

fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation(
            "comment text must not be empty".into(),
        ));
    }
    Ok(())
}
