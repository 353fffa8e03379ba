//! The public-visibility rules.
//!
//! A post is publicly visible iff it is published, its publication instant
//! has passed, and its category (when it has one) is published. Every
//! listing and single-item accessor evaluates exactly this predicate - it
//! lives here and nowhere else.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::query::{Page, PostQuery};

/// The public-visibility invariant.
///
/// The `pub_date` comparison is inclusive: a post publishing exactly at
/// `as_of` is already visible.
pub fn is_visible(post: &Post, category: Option<&Category>, as_of: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= as_of && category.is_none_or(|c| c.is_published)
}

/// Query for the global feed: every publicly visible post as of `as_of`,
/// newest first.
pub fn visible_query(as_of: DateTime<Utc>, page: Page) -> PostQuery {
    PostQuery {
        author_id: None,
        category_id: None,
        visible_as_of: Some(as_of),
        page,
    }
}

/// Query for one category's feed. The caller resolves the category to a
/// *visible* one first; an unpublished category never reaches this point.
pub fn category_query(category_id: Uuid, as_of: DateTime<Utc>, page: Page) -> PostQuery {
    PostQuery {
        author_id: None,
        category_id: Some(category_id),
        visible_as_of: Some(as_of),
        page,
    }
}

/// Query for an author's public feed, as seen by somebody else.
pub fn author_public_query(author_id: Uuid, as_of: DateTime<Utc>, page: Page) -> PostQuery {
    PostQuery {
        author_id: Some(author_id),
        category_id: None,
        visible_as_of: Some(as_of),
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;
    use chrono::TimeDelta;

    fn post(pub_date: DateTime<Utc>, category_id: Option<Uuid>) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost {
                title: "title".into(),
                text: "text".into(),
                pub_date,
                location_id: None,
                category_id,
                image: None,
            },
        )
    }

    fn category(published: bool) -> Category {
        let mut c = Category::new("c".into(), "d".into(), "c".into());
        c.is_published = published;
        c
    }

    #[test]
    fn test_past_post_without_category_is_visible() {
        let now = Utc::now();
        let p = post(now - TimeDelta::days(1), None);
        assert!(is_visible(&p, None, now));
    }

    #[test]
    fn test_future_post_is_hidden() {
        let now = Utc::now();
        let p = post(now + TimeDelta::days(1), None);
        assert!(!is_visible(&p, None, now));
    }

    #[test]
    fn test_pub_date_boundary_is_inclusive() {
        let now = Utc::now();
        let p = post(now, None);
        assert!(is_visible(&p, None, now));
    }

    #[test]
    fn test_unpublished_flag_hides_post() {
        let now = Utc::now();
        let mut p = post(now - TimeDelta::days(1), None);
        p.is_published = false;
        assert!(!is_visible(&p, None, now));
    }

    #[test]
    fn test_unpublished_category_hides_post() {
        let now = Utc::now();
        let c = category(false);
        let p = post(now - TimeDelta::days(1), Some(c.id));
        assert!(!is_visible(&p, Some(&c), now));
    }

    #[test]
    fn test_published_category_keeps_post_visible() {
        let now = Utc::now();
        let c = category(true);
        let p = post(now - TimeDelta::days(1), Some(c.id));
        assert!(is_visible(&p, Some(&c), now));
    }
}
