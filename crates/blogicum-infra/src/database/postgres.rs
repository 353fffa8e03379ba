//! PostgreSQL store implementations.
//!
//! [`PostQuery`] values are evaluated in one pass: filter + join + order +
//! page against the posts table, then one batch query per related table and
//! one grouped aggregate for the comment counts. Cascade and set-null rules
//! live in the schema (see the migration crate), so deletes here are single
//! statements.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DbConn, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{CategoryStore, CommentStore, LocationStore, PostStore, UserStore};
use blogicum_core::query::{FeedEntry, FeedPage, PostQuery};

use super::entity::{category, comment, location, post, user};

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn save_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL user store.
pub struct PostgresUserStore {
    db: DbConn,
}

impl PostgresUserStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = user::Entity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::FirstName,
                        user::Column::LastName,
                        user::Column::Email,
                        user::Column::PasswordHash,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(save_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Join page rows with their related records. One query per table plus
    /// one grouped aggregate for comment counts - never per-row refetches.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<FeedEntry>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
        let location_ids: Vec<Uuid> = models.iter().filter_map(|m| m.location_id).collect();

        let authors: HashMap<Uuid, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let categories: HashMap<Uuid, Category> = category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let locations: HashMap<Uuid, Location> = location::Entity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let counts: HashMap<Uuid, i64> = comment::Entity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .collect();

        models
            .into_iter()
            .map(|model| {
                let author = authors
                    .get(&model.author_id)
                    .cloned()
                    .ok_or_else(|| RepoError::Query("post author missing".to_string()))?;
                let category = model.category_id.and_then(|id| categories.get(&id)).cloned();
                let location = model.location_id.and_then(|id| locations.get(&id)).cloned();
                let comment_count = counts.get(&model.id).copied().unwrap_or(0) as u64;

                Ok(FeedEntry {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<FeedEntry>, RepoError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![model]).await?.into_iter().next())
    }

    async fn query(&self, query: &PostQuery) -> Result<FeedPage, RepoError> {
        let mut select = post::Entity::find();

        if let Some(author_id) = query.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(as_of) = query.visible_as_of {
            // The public-visibility invariant: published, not scheduled,
            // category absent or itself published.
            select = select
                .join(JoinType::LeftJoin, post::Relation::Category.def())
                .filter(post::Column::IsPublished.eq(true))
                .filter(post::Column::PubDate.lte(as_of))
                .filter(
                    Condition::any()
                        .add(post::Column::CategoryId.is_null())
                        .add(category::Column::IsPublished.eq(true)),
                );
        }

        // Id tie-break keeps paging deterministic on equal timestamps,
        // matching the in-memory store's ordering.
        let select = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id);

        let paginator = select.paginate(&self.db, query.page.size);
        let total = paginator.num_items().await.map_err(query_err)?;
        let models = paginator
            .fetch_page(query.page.number - 1)
            .await
            .map_err(query_err)?;

        let entries = self.hydrate(models).await?;

        Ok(FeedPage {
            entries,
            total,
            page: query.page.number,
            page_size: query.page.size,
        })
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = entity.into();
        let model = post::Entity::insert(active)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Text,
                        post::Column::PubDate,
                        post::Column::LocationId,
                        post::Column::CategoryId,
                        post::Column::Image,
                        post::Column::IsPublished,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(save_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL category store.
pub struct PostgresCategoryStore {
    db: DbConn,
}

impl PostgresCategoryStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = entity.into();
        let model = category::Entity::insert(active)
            .on_conflict(
                OnConflict::column(category::Column::Id)
                    .update_columns([
                        category::Column::Title,
                        category::Column::Description,
                        category::Column::Slug,
                        category::Column::IsPublished,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(save_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL location store.
pub struct PostgresLocationStore {
    db: DbConn,
}

impl PostgresLocationStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationStore for PostgresLocationStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        let result = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Location) -> Result<Location, RepoError> {
        let active: location::ActiveModel = entity.into();
        let model = location::Entity::insert(active)
            .on_conflict(
                OnConflict::column(location::Column::Id)
                    .update_columns([location::Column::Name, location::Column::IsPublished])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(save_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = location::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL comment store.
pub struct PostgresCommentStore {
    db: DbConn,
}

impl PostgresCommentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = entity.into();
        // created_at is immutable: only the text may change on conflict.
        let model = comment::Entity::insert(active)
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([comment::Column::Text])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(save_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
