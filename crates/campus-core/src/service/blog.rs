//! Blog use cases with owner-scoped mutations.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{DEFAULT_PER_PAGE, PageWindow, Post, PostDraft, PostPage};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, UserRepository};

/// Blog operations over the post and user repositories.
///
/// Edits and deletes by anyone other than the owner fail with
/// [`DomainError::NotFound`], the same error a missing post produces.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    per_page: u64,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            posts,
            users,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// One page of the index, newest first.
    pub async fn list_posts(&self, page: Option<&str>) -> Result<PostPage, DomainError> {
        let total = self.posts.count().await?;
        let window = PageWindow::resolve(page, total, self.per_page);
        let posts = self
            .posts
            .list_recent(window.offset(), window.per_page)
            .await?;

        tracing::debug!(
            page = window.number,
            num_pages = window.num_pages,
            returned = posts.len(),
            "Listed posts"
        );

        Ok(PostPage { posts, window })
    }

    /// Create a post owned by `owner_id`.
    pub async fn create_post(&self, owner_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let draft = draft.validate()?;
        let post = self.posts.save(Post::new(owner_id, draft)).await?;

        tracing::info!(post_id = %post.id, owner_id = %owner_id, "Post created");
        Ok(post)
    }

    /// Load a post for its owner's edit form.
    pub async fn post_for_edit(&self, requester: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        self.owned_post(requester, post_id).await
    }

    /// Replace title and text of a post the requester owns.
    pub async fn edit_post(
        &self,
        requester: Uuid,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(requester, post_id).await?;
        post.apply(draft.validate()?);

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, "Post edited");
        Ok(post)
    }

    /// Delete a post the requester owns.
    pub async fn delete_post(&self, requester: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        self.owned_post(requester, post_id).await?;

        match self.posts.delete(post_id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(post_id)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Delete a user account together with every post it owns.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), DomainError> {
        match self.users.delete(user_id).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "Account deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn owned_post(&self, requester: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        match self.posts.find_by_id(post_id).await? {
            Some(post) if post.is_owned_by(requester) => Ok(post),
            Some(_) => {
                tracing::warn!(
                    post_id = %post_id,
                    requester = %requester,
                    "Rejected access to a post owned by someone else"
                );
                Err(DomainError::post_not_found(post_id))
            }
            None => Err(DomainError::post_not_found(post_id)),
        }
    }
}
