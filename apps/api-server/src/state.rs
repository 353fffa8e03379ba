//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::access::AccessControl;
use blogicum_core::comments::Comments;
use blogicum_core::feed::Feeds;
use blogicum_core::ports::{
    CategoryStore, CommentStore, LocationStore, PasswordService, PostStore, TokenService,
    UserStore,
};
use blogicum_infra::auth::{Argon2PasswordService, JwtTokenService};
use blogicum_infra::database::{
    self, PostgresCategoryStore, PostgresCommentStore, PostgresLocationStore, PostgresPostStore,
    PostgresUserStore,
};
use blogicum_infra::memory::MemoryStore;

use crate::config::AppConfig;

struct Stores {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    categories: Arc<dyn CategoryStore>,
    locations: Arc<dyn LocationStore>,
    comments: Arc<dyn CommentStore>,
}

/// Shared application state: store handles, the domain services built on
/// them, and the identity collaborator.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub feeds: Feeds,
    pub access: AccessControl,
    pub posts: blogicum_core::posts::Posts,
    pub comments: Comments,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let stores = match &config.database {
            Some(db_config) => match database::connect(db_config).await {
                Ok(db) => Stores {
                    users: Arc::new(PostgresUserStore::new(db.clone())),
                    posts: Arc::new(PostgresPostStore::new(db.clone())),
                    categories: Arc::new(PostgresCategoryStore::new(db.clone())),
                    locations: Arc::new(PostgresLocationStore::new(db.clone())),
                    comments: Arc::new(PostgresCommentStore::new(db)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::memory_stores()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::memory_stores()
            }
        };

        let access = AccessControl::new(stores.posts.clone(), stores.comments.clone());
        let feeds = Feeds::new(
            stores.posts.clone(),
            stores.categories.clone(),
            stores.users.clone(),
        );
        let posts = blogicum_core::posts::Posts::new(
            stores.posts.clone(),
            stores.categories,
            stores.locations,
            access.clone(),
        );
        let comments = Comments::new(stores.posts, stores.comments, access.clone());

        tracing::info!("Application state initialized");

        Self {
            users: stores.users,
            feeds,
            access,
            posts,
            comments,
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    fn memory_stores() -> Stores {
        let store = Arc::new(MemoryStore::new());
        Stores {
            users: store.clone(),
            posts: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            comments: store,
        }
    }
}
