#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::{category, post};
    use crate::database::postgres::{PostgresCategoryStore, PostgresPostStore};
    use blogicum_core::domain::Post;
    use blogicum_core::ports::{CategoryStore, PostStore};
    use blogicum_core::query::Page;
    use blogicum_core::visibility::visible_query;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn post_model(title: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            location_id: None,
            category_id: None,
            image: None,
            is_published: true,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let model = post_model("Test Post");
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let store = PostgresPostStore::new(db);

        let result: Option<Post> = store.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
    }

    #[tokio::test]
    async fn test_find_category_by_slug() {
        let now = chrono::Utc::now();
        let model = category::Model {
            id: uuid::Uuid::new_v4(),
            title: "Travel".to_owned(),
            description: "Trips and places".to_owned(),
            slug: "travel".to_owned(),
            is_published: true,
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let store = PostgresCategoryStore::new(db);

        let category = store.find_by_slug("travel").await.unwrap().unwrap();
        assert_eq!(category.slug, "travel");
        assert!(category.is_published);
    }

    // Equal timestamps must page identically here and in the memory store,
    // so the feed select carries an id tie-break after the date ordering.
    #[tokio::test]
    async fn test_feed_query_orders_by_dates_then_id() {
        let count_row: BTreeMap<&str, Value> =
            BTreeMap::from([("num_items", Value::BigInt(Some(0)))]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row]])
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let store = PostgresPostStore::new(db.clone());
        let page = store
            .query(&visible_query(chrono::Utc::now(), Page::new(1)))
            .await
            .unwrap();
        assert!(page.entries.is_empty());

        // Debug output escapes the quoted identifiers; undo that before
        // matching the SQL.
        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(log.contains(
            r#"ORDER BY "posts"."pub_date" DESC, "posts"."created_at" DESC, "posts"."id" ASC"#
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let store = PostgresPostStore::new(db);

        let result = store.delete(uuid::Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(blogicum_core::error::RepoError::NotFound)
        ));
    }
}
