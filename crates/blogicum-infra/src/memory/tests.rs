//! Behavior tests for the domain services running over the in-memory store.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use blogicum_core::access::AccessControl;
use blogicum_core::comments::Comments;
use blogicum_core::domain::{Category, Comment, NewPost, Post, PostChanges, User};
use blogicum_core::error::DomainError;
use blogicum_core::feed::Feeds;
use blogicum_core::ports::{CategoryStore, CommentStore, LocationStore, PostStore, UserStore};
use blogicum_core::posts::Posts;
use blogicum_core::query::{FeedPage, PAGE_SIZE, Page};

use super::MemoryStore;

struct Fixture {
    store: Arc<MemoryStore>,
    feeds: Feeds,
    access: AccessControl,
    posts: Posts,
    comments: Comments,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let posts: Arc<dyn PostStore> = store.clone();
    let categories: Arc<dyn CategoryStore> = store.clone();
    let locations: Arc<dyn LocationStore> = store.clone();
    let users: Arc<dyn UserStore> = store.clone();
    let comment_store: Arc<dyn CommentStore> = store.clone();

    let access = AccessControl::new(posts.clone(), comment_store.clone());
    let feeds = Feeds::new(posts.clone(), categories.clone(), users);
    let post_service = Posts::new(posts.clone(), categories, locations, access.clone());
    let comments = Comments::new(posts, comment_store, access.clone());

    Fixture {
        store,
        feeds,
        access,
        posts: post_service,
        comments,
    }
}

async fn seed_user(store: &MemoryStore, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        "Test".to_string(),
        "Author".to_string(),
        format!("{username}@example.com"),
        "hash".to_string(),
    );
    UserStore::save(store, user).await.unwrap()
}

async fn seed_category(store: &MemoryStore, slug: &str, published: bool) -> Category {
    let mut category = Category::new(slug.to_string(), "about".to_string(), slug.to_string());
    category.is_published = published;
    CategoryStore::save(store, category).await.unwrap()
}

async fn seed_post(
    store: &MemoryStore,
    author: &User,
    pub_date: DateTime<Utc>,
    category_id: Option<Uuid>,
    published: bool,
) -> Post {
    let mut post = Post::new(
        author.id,
        NewPost {
            title: "a post".to_string(),
            text: "text".to_string(),
            pub_date,
            location_id: None,
            category_id,
            image: None,
        },
    );
    post.is_published = published;
    PostStore::save(store, post).await.unwrap()
}

fn ids(page: &FeedPage) -> Vec<Uuid> {
    page.entries.iter().map(|e| e.post.id).collect()
}

#[tokio::test]
async fn test_global_feed_matches_visibility_invariant() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let visible_cat = seed_category(&f.store, "cats", true).await;
    let hidden_cat = seed_category(&f.store, "dogs", false).await;

    let past = now - TimeDelta::days(1);
    let future = now + TimeDelta::days(1);

    let shown_no_cat = seed_post(&f.store, &author, past, None, true).await;
    let shown_cat = seed_post(&f.store, &author, past, Some(visible_cat.id), true).await;
    let scheduled = seed_post(&f.store, &author, future, None, true).await;
    let unpublished = seed_post(&f.store, &author, past, None, false).await;
    let in_hidden_cat = seed_post(&f.store, &author, past, Some(hidden_cat.id), true).await;

    let feed = f.feeds.global(now, Page::new(1)).await.unwrap();
    let listed = ids(&feed);

    assert!(listed.contains(&shown_no_cat.id));
    assert!(listed.contains(&shown_cat.id));
    assert!(!listed.contains(&scheduled.id));
    assert!(!listed.contains(&unpublished.id));
    assert!(!listed.contains(&in_hidden_cat.id));
    assert_eq!(feed.total, 2);
}

#[tokio::test]
async fn test_global_feed_is_newest_first_and_idempotent() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;

    for days in 1..=5 {
        seed_post(&f.store, &author, now - TimeDelta::days(days), None, true).await;
    }

    let first = f.feeds.global(now, Page::new(1)).await.unwrap();
    let second = f.feeds.global(now, Page::new(1)).await.unwrap();

    assert_eq!(ids(&first), ids(&second));
    let dates: Vec<_> = first.entries.iter().map(|e| e.post.pub_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn test_pub_date_boundary_is_inclusive_in_listing() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let post = seed_post(&f.store, &author, now, None, true).await;

    let feed = f.feeds.global(now, Page::new(1)).await.unwrap();
    assert_eq!(ids(&feed), vec![post.id]);
}

#[tokio::test]
async fn test_feed_pagination_is_fixed_at_ten() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;

    for minutes in 1..=25 {
        seed_post(
            &f.store,
            &author,
            now - TimeDelta::minutes(minutes),
            None,
            true,
        )
        .await;
    }

    let page1 = f.feeds.global(now, Page::new(1)).await.unwrap();
    let page3 = f.feeds.global(now, Page::new(3)).await.unwrap();

    assert_eq!(page1.entries.len() as u64, PAGE_SIZE);
    assert_eq!(page1.total, 25);
    assert_eq!(page1.total_pages(), 3);
    assert_eq!(page3.entries.len(), 5);
}

#[tokio::test]
async fn test_comment_counts_are_annotated_per_entry() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let reader = seed_user(&f.store, "reader").await;
    let post = seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;

    for i in 0..3 {
        f.comments
            .create(reader.id, post.id, format!("comment {i}"))
            .await
            .unwrap();
    }

    let feed = f.feeds.global(now, Page::new(1)).await.unwrap();
    assert_eq!(feed.entries[0].comment_count, 3);
}

// Scenario: scheduled post is absent from the public feed but present when
// the author views their own profile.
#[tokio::test]
async fn test_scheduled_post_only_visible_to_its_author() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let stranger = seed_user(&f.store, "stranger").await;
    let scheduled = seed_post(&f.store, &author, now + TimeDelta::days(1), None, true).await;

    let global = f.feeds.global(now, Page::new(1)).await.unwrap();
    assert!(ids(&global).is_empty());

    let (_, own) = f
        .feeds
        .author("author", Some(author.id), now, Page::new(1))
        .await
        .unwrap();
    assert_eq!(ids(&own), vec![scheduled.id]);

    let (_, other) = f
        .feeds
        .author("author", Some(stranger.id), now, Page::new(1))
        .await
        .unwrap();
    assert!(ids(&other).is_empty());

    let (_, anonymous) = f
        .feeds
        .author("author", None, now, Page::new(1))
        .await
        .unwrap();
    assert!(ids(&anonymous).is_empty());
}

// Scenario: post in an unpublished category is hidden everywhere, and its
// detail view answers not-found for anyone but the author.
#[tokio::test]
async fn test_unpublished_category_hides_post_everywhere() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let stranger = seed_user(&f.store, "stranger").await;
    let hidden_cat = seed_category(&f.store, "secret", false).await;
    let post = seed_post(
        &f.store,
        &author,
        now - TimeDelta::days(1),
        Some(hidden_cat.id),
        true,
    )
    .await;

    assert!(ids(&f.feeds.global(now, Page::new(1)).await.unwrap()).is_empty());

    // The unpublished category itself does not exist for browsing.
    assert!(matches!(
        f.feeds.category("secret", now, Page::new(1)).await,
        Err(DomainError::NotFound { .. })
    ));

    // Hidden and absent are indistinguishable for a non-author.
    assert!(matches!(
        f.access
            .resolve_owned_or_visible(Some(stranger.id), post.id, now)
            .await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        f.access.resolve_owned_or_visible(None, post.id, now).await,
        Err(DomainError::NotFound { .. })
    ));

    // The author still reaches their own post.
    let entry = f
        .access
        .resolve_owned_or_visible(Some(author.id), post.id, now)
        .await
        .unwrap();
    assert_eq!(entry.post.id, post.id);
}

#[tokio::test]
async fn test_category_feed_lists_only_that_category() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let cats = seed_category(&f.store, "cats", true).await;
    let dogs = seed_category(&f.store, "dogs", true).await;

    let in_cats = seed_post(&f.store, &author, now - TimeDelta::days(1), Some(cats.id), true).await;
    seed_post(&f.store, &author, now - TimeDelta::days(1), Some(dogs.id), true).await;
    seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;

    let (category, feed) = f.feeds.category("cats", now, Page::new(1)).await.unwrap();
    assert_eq!(category.id, cats.id);
    assert_eq!(ids(&feed), vec![in_cats.id]);
}

#[tokio::test]
async fn test_unknown_username_is_not_found() {
    let f = fixture();
    assert!(matches!(
        f.feeds.author("ghost", None, Utc::now(), Page::new(1)).await,
        Err(DomainError::NotFound { .. })
    ));
}

// Scenario: a foreign actor on someone else's comment is denied and pointed
// back at the parent post, with the comment left untouched.
#[tokio::test]
async fn test_foreign_comment_author_is_denied_with_redirect() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let intruder = seed_user(&f.store, "intruder").await;
    let post = seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;

    let comment = f
        .comments
        .create(author.id, post.id, "original".to_string())
        .await
        .unwrap();

    let denied = f
        .comments
        .update(intruder.id, comment.id, "defaced".to_string())
        .await;
    match denied {
        Err(DomainError::PermissionDenied { post_id }) => assert_eq!(post_id, post.id),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    let unchanged = CommentStore::find_by_id(f.store.as_ref(), comment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.text, "original");

    assert!(matches!(
        f.comments.delete(intruder.id, comment.id).await,
        Err(DomainError::PermissionDenied { .. })
    ));
}

fn draft(pub_date: DateTime<Utc>, category_id: Option<Uuid>) -> NewPost {
    NewPost {
        title: "a post".to_string(),
        text: "text".to_string(),
        pub_date,
        location_id: None,
        category_id,
        image: None,
    }
}

// Scenario: a foreign actor on someone else's post is denied and pointed
// back at that post, with the post left untouched.
#[tokio::test]
async fn test_foreign_post_author_is_denied_with_redirect() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let intruder = seed_user(&f.store, "intruder").await;

    let post = f
        .posts
        .create(author.id, draft(now - TimeDelta::days(1), None))
        .await
        .unwrap();

    let denied = f
        .posts
        .update(
            intruder.id,
            post.id,
            PostChanges {
                title: Some("defaced".to_string()),
                ..PostChanges::default()
            },
        )
        .await;
    match denied {
        Err(DomainError::PermissionDenied { post_id }) => assert_eq!(post_id, post.id),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    let unchanged = PostStore::find_by_id(f.store.as_ref(), post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "a post");

    assert!(matches!(
        f.posts.delete(intruder.id, post.id).await,
        Err(DomainError::PermissionDenied { .. })
    ));
    assert!(
        PostStore::find_by_id(f.store.as_ref(), post.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_post_references_must_exist() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;

    let dangling = NewPost {
        category_id: Some(Uuid::new_v4()),
        ..draft(now, None)
    };
    assert!(matches!(
        f.posts.create(author.id, dangling).await,
        Err(DomainError::Validation(_))
    ));

    let post = f.posts.create(author.id, draft(now, None)).await.unwrap();
    let changes = PostChanges {
        location_id: Some(Some(Uuid::new_v4())),
        ..PostChanges::default()
    };
    assert!(matches!(
        f.posts.update(author.id, post.id, changes).await,
        Err(DomainError::Validation(_))
    ));
}

// An explicit null in the update clears the reference; an absent field
// leaves it untouched.
#[tokio::test]
async fn test_update_distinguishes_clear_from_keep() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let category = seed_category(&f.store, "cats", true).await;

    let post = f
        .posts
        .create(author.id, draft(now, Some(category.id)))
        .await
        .unwrap();

    let kept = f
        .posts
        .update(
            author.id,
            post.id,
            PostChanges {
                title: Some("renamed".to_string()),
                ..PostChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.title, "renamed");
    assert_eq!(kept.category_id, Some(category.id));

    let cleared = f
        .posts
        .update(
            author.id,
            post.id,
            PostChanges {
                category_id: Some(None),
                ..PostChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.category_id, None);
}

#[tokio::test]
async fn test_author_delete_removes_the_post() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let post = f.posts.create(author.id, draft(now, None)).await.unwrap();

    f.posts.delete(author.id, post.id).await.unwrap();

    assert!(
        PostStore::find_by_id(f.store.as_ref(), post.id)
            .await
            .unwrap()
            .is_none()
    );
}

// Comment creation checks existence only, not visibility: a direct link to
// a scheduled post accepts comments.
#[tokio::test]
async fn test_comments_allowed_on_hidden_posts() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let reader = seed_user(&f.store, "reader").await;
    let scheduled = seed_post(&f.store, &author, now + TimeDelta::days(1), None, true).await;

    let comment = f
        .comments
        .create(reader.id, scheduled.id, "early!".to_string())
        .await
        .unwrap();
    assert_eq!(comment.post_id, scheduled.id);

    assert!(matches!(
        f.comments
            .create(reader.id, Uuid::new_v4(), "void".to_string())
            .await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_comments_list_oldest_first() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let post = seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;

    for i in 0..3 {
        let mut comment = Comment::new(post.id, author.id, format!("c{i}"));
        comment.created_at = now - TimeDelta::hours(3 - i);
        CommentStore::save(f.store.as_ref(), comment).await.unwrap();
    }

    let listed = f.comments.list_for_post(post.id).await.unwrap();
    let texts: Vec<_> = listed.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["c0", "c1", "c2"]);
}

// Scenario: reference integrity. Deleting a category nulls the reference on
// its posts; deleting a post removes its comments.
#[tokio::test]
async fn test_category_delete_nulls_references() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let category = seed_category(&f.store, "cats", true).await;

    let mut post_ids = Vec::new();
    for _ in 0..3 {
        let post = seed_post(
            &f.store,
            &author,
            now - TimeDelta::days(1),
            Some(category.id),
            true,
        )
        .await;
        post_ids.push(post.id);
    }

    CategoryStore::delete(f.store.as_ref(), category.id)
        .await
        .unwrap();

    for id in post_ids {
        let post = PostStore::find_by_id(f.store.as_ref(), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.category_id, None);
    }
}

#[tokio::test]
async fn test_post_delete_cascades_to_comments() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let post = seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;

    let c1 = f
        .comments
        .create(author.id, post.id, "one".to_string())
        .await
        .unwrap();
    let c2 = f
        .comments
        .create(author.id, post.id, "two".to_string())
        .await
        .unwrap();

    PostStore::delete(f.store.as_ref(), post.id).await.unwrap();

    for id in [c1.id, c2.id] {
        assert!(
            CommentStore::find_by_id(f.store.as_ref(), id)
                .await
                .unwrap()
                .is_none()
        );
    }
}

#[tokio::test]
async fn test_user_delete_cascades_to_posts_and_comments() {
    let f = fixture();
    let now = Utc::now();
    let author = seed_user(&f.store, "author").await;
    let other = seed_user(&f.store, "other").await;
    let own_post = seed_post(&f.store, &author, now - TimeDelta::days(1), None, true).await;
    let other_post = seed_post(&f.store, &other, now - TimeDelta::days(1), None, true).await;

    // Comment by the doomed user on someone else's post goes too.
    let stray = f
        .comments
        .create(author.id, other_post.id, "bye".to_string())
        .await
        .unwrap();

    UserStore::delete(f.store.as_ref(), author.id).await.unwrap();

    assert!(
        PostStore::find_by_id(f.store.as_ref(), own_post.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        CommentStore::find_by_id(f.store.as_ref(), stray.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        PostStore::find_by_id(f.store.as_ref(), other_post.id)
            .await
            .unwrap()
            .is_some()
    );
}
