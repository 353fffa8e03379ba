//! In-memory entity store.
//!
//! Used as fallback when no database is configured, and as the test double
//! for the domain services. Implements the same referential-integrity rules
//! the relational schema enforces: deleting a user cascades to their posts
//! and comments, deleting a post cascades to its comments, deleting a
//! category or location nulls the reference on surviving posts.
//! Note: data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{CategoryStore, CommentStore, LocationStore, PostStore, UserStore};
use blogicum_core::query::{FeedEntry, FeedPage, PostQuery};
use blogicum_core::visibility::is_visible;

#[cfg(test)]
mod tests;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn entry(&self, post: &Post) -> Result<FeedEntry, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .cloned()
            .ok_or_else(|| RepoError::Query("post author missing".to_string()))?;
        let category = post.category_id.and_then(|id| self.categories.get(&id)).cloned();
        let location = post.location_id.and_then(|id| self.locations.get(&id)).cloned();
        let comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id)
            .count() as u64;

        Ok(FeedEntry {
            post: post.clone(),
            author,
            category,
            location,
            comment_count,
        })
    }

    fn matches(&self, post: &Post, query: &PostQuery) -> bool {
        if let Some(author_id) = query.author_id
            && post.author_id != author_id
        {
            return false;
        }
        if let Some(category_id) = query.category_id
            && post.category_id != Some(category_id)
        {
            return false;
        }
        if let Some(as_of) = query.visible_as_of {
            let category = post.category_id.and_then(|id| self.categories.get(&id));
            if !is_visible(post, category, as_of) {
                return false;
            }
        }
        true
    }
}

/// In-memory store backed by HashMaps behind an async RwLock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.users.values().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        if duplicate {
            return Err(RepoError::Constraint(
                "username or email already taken".to_string(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let gone_posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|_, c| c.author_id != id && !gone_posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<FeedEntry>, RepoError> {
        let tables = self.tables.read().await;
        match tables.posts.get(&id) {
            Some(post) => Ok(Some(tables.entry(post)?)),
            None => Ok(None),
        }
    }

    async fn query(&self, query: &PostQuery) -> Result<FeedPage, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| tables.matches(p, query))
            .collect();
        // Default order, newest first; id as tie-break so equal timestamps
        // still page deterministically.
        matching.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let entries = matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.size as usize)
            .map(|p| tables.entry(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedPage {
            entries,
            total,
            page: query.page.number,
            page_size: query.page.size,
        })
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug);
        if duplicate {
            return Err(RepoError::Constraint("slug already taken".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
