//! Blog use cases exercised against the in-memory repositories.

use std::sync::Arc;

use campus_core::BlogService;
use campus_core::DomainError;
use campus_core::domain::{PostDraft, User};
use campus_core::ports::{BaseRepository, PostRepository};
use campus_infra::InMemoryStore;
use uuid::Uuid;

struct Fixture {
    store: InMemoryStore,
    service: BlogService,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let service = BlogService::new(Arc::new(store.posts()), Arc::new(store.users()));
        Self { store, service }
    }

    async fn user(&self, email: &str) -> User {
        self.store
            .users()
            .save(User::new(email, "hash".to_string()))
            .await
            .unwrap()
    }
}

fn draft(title: &str) -> PostDraft {
    PostDraft::new(title, "some text")
}

#[tokio::test]
async fn test_create_post_is_owned_by_caller() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;

    let post = fx.service.create_post(alice.id, draft("Hello")).await.unwrap();

    assert_eq!(post.owner_id, alice.id);
    let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.owner_id, alice.id);
}

#[tokio::test]
async fn test_create_rejects_invalid_draft() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;

    let result = fx.service.create_post(alice.id, PostDraft::new("", "")).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(fx.store.posts().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_owner_edit_and_delete_are_not_found() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;
    let mallory = fx.user("mallory@example.com").await;
    let post = fx.service.create_post(alice.id, draft("Mine")).await.unwrap();

    let edit = fx
        .service
        .edit_post(mallory.id, post.id, draft("Hijacked"))
        .await;
    assert!(matches!(edit, Err(DomainError::NotFound { id, .. }) if id == post.id));

    let form = fx.service.post_for_edit(mallory.id, post.id).await;
    assert!(matches!(form, Err(DomainError::NotFound { .. })));

    let delete = fx.service.delete_post(mallory.id, post.id).await;
    assert!(matches!(delete, Err(DomainError::NotFound { .. })));

    let stored = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mine");
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;

    let result = fx.service.delete_post(alice.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_owner_can_edit_and_delete() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;
    let post = fx.service.create_post(alice.id, draft("Draft")).await.unwrap();

    let edited = fx
        .service
        .edit_post(alice.id, post.id, PostDraft::new("Final", "final text"))
        .await
        .unwrap();
    assert_eq!(edited.title, "Final");
    assert_eq!(edited.text, "final text");
    assert_eq!(edited.created_at, post.created_at);

    fx.service.delete_post(alice.id, post.id).await.unwrap();
    assert!(fx.store.posts().find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_account_removes_owned_posts() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;
    let bob = fx.user("bob@example.com").await;
    for i in 0..4 {
        fx.service
            .create_post(alice.id, draft(&format!("alice {i}")))
            .await
            .unwrap();
    }
    let kept = fx.service.create_post(bob.id, draft("bob")).await.unwrap();

    fx.service.delete_account(alice.id).await.unwrap();

    assert!(fx.store.posts().find_by_owner(alice.id).await.unwrap().is_empty());
    let page = fx.service.list_posts(None).await.unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].id, kept.id);
}

#[tokio::test]
async fn test_index_pages_hold_six_posts() {
    let fx = Fixture::new();
    let alice = fx.user("alice@example.com").await;
    for i in 0..13 {
        fx.service
            .create_post(alice.id, draft(&format!("post {i}")))
            .await
            .unwrap();
    }

    let first = fx.service.list_posts(None).await.unwrap();
    assert_eq!(first.posts.len(), 6);
    assert_eq!(first.window.num_pages, 3);
    assert!(first.window.has_other_pages());

    let last = fx.service.list_posts(Some("3")).await.unwrap();
    assert_eq!(last.posts.len(), 1);

    let beyond = fx.service.list_posts(Some("42")).await.unwrap();
    assert_eq!(beyond.window.number, 3);
}
