//! Query specification values.
//!
//! Instead of chaining filters against the store ad hoc, every listing is
//! described by one [`PostQuery`] value (predicate + join + order + page)
//! that the store evaluates in a single pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Location, Post, User};

/// Posts per feed page, everywhere.
pub const PAGE_SIZE: u64 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(number: u64) -> Self {
        Self {
            number: number.max(1),
            size: PAGE_SIZE,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Declarative description of a post listing.
///
/// Order is always `pub_date` descending (the entity's default order).
/// `visible_as_of: Some(t)` restricts results to the public-visibility
/// invariant evaluated at `t`; `None` means no visibility restriction
/// (owner viewing their own profile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub visible_as_of: Option<DateTime<Utc>>,
    pub page: Page,
}

impl PostQuery {
    /// All posts by one author, unrestricted. Owner-only.
    pub fn by_author(author_id: Uuid, page: Page) -> Self {
        Self {
            author_id: Some(author_id),
            category_id: None,
            visible_as_of: None,
            page,
        }
    }
}

/// A post joined with everything a feed needs to render it.
///
/// Built by the store in one pass per page: related rows are batch-loaded
/// and comment counts come from a single aggregate query, never from
/// per-item refetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

/// One page of feed entries plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    /// Total matching posts across all pages.
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl FeedPage {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_one_based() {
        assert_eq!(Page::new(0).number, 1);
        assert_eq!(Page::new(1).offset(), 0);
        assert_eq!(Page::new(3).offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = FeedPage {
            entries: vec![],
            total: 21,
            page: 1,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
