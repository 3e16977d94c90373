//! Application state - shared across all handlers.

use std::sync::Arc;

use serde::Serialize;

use campus_core::BlogService;
use campus_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use campus_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use campus_infra::database::{
    DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Where posts and users live for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Postgres,
    /// Lost on restart; used when no database is configured or reachable.
    Memory,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>, Storage);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let (posts, users, storage) = Self::repositories(config).await;

        tracing::info!(
            ?storage,
            posts_per_page = config.posts_per_page,
            "Application state initialized"
        );

        Self::from_parts(posts, users, tokens, config.posts_per_page, storage)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, posts_per_page: u64) -> Self {
        let store = InMemoryStore::new();
        Self::from_parts(
            Arc::new(store.posts()),
            Arc::new(store.users()),
            tokens,
            posts_per_page,
            Storage::Memory,
        )
    }

    fn from_parts(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        posts_per_page: u64,
        storage: Storage,
    ) -> Self {
        Self {
            blog: BlogService::new(posts, users.clone()).with_per_page(posts_per_page),
            users,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    return (
                        Arc::new(PostgresPostRepository::new(Arc::clone(&connections.main))),
                        Arc::new(PostgresUserRepository::new(connections.main)),
                        Storage::Postgres,
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let store = InMemoryStore::new();
        (Arc::new(store.posts()), Arc::new(store.users()), Storage::Memory)
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        let store = InMemoryStore::new();
        (Arc::new(store.posts()), Arc::new(store.users()), Storage::Memory)
    }
}
