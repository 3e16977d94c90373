use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest title a post may carry, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Post entity - a blog post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `owner_id` from a validated draft.
    pub fn new(owner_id: Uuid, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title,
            text: draft.text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Replace the editable fields. Owner and creation time never change.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.updated_at = Utc::now();
    }
}

/// The user-editable part of a post: title and body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Check the draft the way the post form does: both fields required,
    /// title capped at [`TITLE_MAX_CHARS`].
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("title is required".to_string());
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push(format!(
                "title must be at most {} characters",
                TITLE_MAX_CHARS
            ));
        }
        if self.text.trim().is_empty() {
            errors.push("text is required".to_string());
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}
