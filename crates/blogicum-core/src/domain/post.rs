use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog publication.
///
/// `pub_date` in the future means a scheduled publication. Category and
/// location references are nullable and survive deletion of their target
/// (the store sets them to null rather than deleting the post).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Stored path of an attached image; upload handling lives elsewhere.
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: Uuid, draft: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            location_id: draft.location_id,
            category_id: draft.category_id,
            image: draft.image,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(text) = changes.text {
            self.text = text;
        }
        if let Some(pub_date) = changes.pub_date {
            self.pub_date = pub_date;
        }
        if let Some(location_id) = changes.location_id {
            self.location_id = location_id;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(image) = changes.image {
            self.image = image;
        }
    }
}

/// Author-supplied fields for a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
}

/// Partial update of a post. Inner `Option`s distinguish "clear the
/// reference" (`Some(None)`) from "leave untouched" (`None`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub location_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
    pub image: Option<Option<String>>,
}
