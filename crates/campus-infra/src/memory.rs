//! In-memory repositories - used when no database is configured.
//!
//! Users and posts live in one store so that deleting a user can drop their
//! posts under the same lock, mirroring the cascading foreign key.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use campus_core::domain::{Post, User};
use campus_core::error::RepoError;
use campus_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
}

/// Shared backing store for the in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }
}

/// In-memory user repository.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;

        let email_taken = tables
            .users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id);
        if email_taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let before = tables.posts.len();
        tables.posts.retain(|_, post| post.owner_id != id);
        tracing::debug!(
            user_id = %id,
            removed_posts = before - tables.posts.len(),
            "Cascaded user delete to posts"
        );

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;

        if !tables.users.contains_key(&post.owner_id) {
            return Err(RepoError::Constraint(format!(
                "Owner {} does not exist",
                post.owner_id
            )));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.len() as u64)
    }

    async fn list_recent(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<&Post> = tables.posts.values().collect();
        // Newest first; the id breaks ties so pages are stable.
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::domain::PostDraft;

    fn user(email: &str) -> User {
        User::new(email, "hash".to_string())
    }

    #[tokio::test]
    async fn test_post_requires_existing_owner() {
        let store = InMemoryStore::new();
        let post = Post::new(Uuid::new_v4(), PostDraft::new("t", "b"));

        let result = store.posts().save(post).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        store.users().save(user("a@example.com")).await.unwrap();

        let result = store.users().save(user("a@example.com")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_to_posts() {
        let store = InMemoryStore::new();
        let alice = store.users().save(user("alice@example.com")).await.unwrap();
        let bob = store.users().save(user("bob@example.com")).await.unwrap();

        let posts = store.posts();
        for i in 0..3 {
            posts
                .save(Post::new(alice.id, PostDraft::new(format!("a{i}"), "body")))
                .await
                .unwrap();
        }
        posts
            .save(Post::new(bob.id, PostDraft::new("b", "body")))
            .await
            .unwrap();

        store.users().delete(alice.id).await.unwrap();

        assert!(posts.find_by_owner(alice.id).await.unwrap().is_empty());
        assert_eq!(posts.find_by_owner(bob.id).await.unwrap().len(), 1);
        assert_eq!(posts.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_recent_is_newest_first() {
        let store = InMemoryStore::new();
        let owner = store.users().save(user("o@example.com")).await.unwrap();
        let posts = store.posts();

        let base = chrono::Utc::now();
        for i in 0..8 {
            let mut post = Post::new(owner.id, PostDraft::new(format!("p{i}"), "body"));
            post.created_at = base + chrono::TimeDelta::seconds(i);
            posts.save(post).await.unwrap();
        }

        let first = posts.list_recent(0, 6).await.unwrap();
        let titles: Vec<&str> = first.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["p7", "p6", "p5", "p4", "p3", "p2"]);

        let second = posts.list_recent(6, 6).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].title, "p0");
    }
}
