//! Entity store ports.
//!
//! The store is an external collaborator: it owns referential integrity
//! (deleting a user cascades to their posts and comments, deleting a post
//! cascades to its comments, deleting a category or location nulls the
//! reference on surviving posts) and evaluates [`PostQuery`] values in a
//! single pass, ordered `pub_date` descending, with comment counts computed
//! as one aggregate per page.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, User};
use crate::error::RepoError;
use crate::query::{FeedEntry, FeedPage, PostQuery};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    /// Batch lookup, for annotating comment authors without per-item queries.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
    /// Insert or update.
    async fn save(&self, user: User) -> Result<User, RepoError>;
    /// Hard delete; cascades to the user's posts and comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;
    /// The post joined with author, category, location and comment count.
    async fn find_entry(&self, id: Uuid) -> Result<Option<FeedEntry>, RepoError>;
    /// Evaluate a query specification into one feed page.
    async fn query(&self, query: &PostQuery) -> Result<FeedPage, RepoError>;
    async fn save(&self, post: Post) -> Result<Post, RepoError>;
    /// Hard delete; cascades to the post's comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
    async fn save(&self, category: Category) -> Result<Category, RepoError>;
    /// Hard delete; referencing posts get `category_id = null`.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError>;
    async fn save(&self, location: Location) -> Result<Location, RepoError>;
    /// Hard delete; referencing posts get `location_id = null`.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;
    /// All comments of one post, `created_at` ascending.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
