//! Data Transfer Objects - request/response types for the blog API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Submitted post form.
///
/// Only `title` and `text` are editable. An `owner_id` of any JSON type is
/// accepted and never used: the owner is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<serde_json::Value>,
}

/// A single post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Pagination metadata for the post index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_paginated: bool,
}

/// One page of the post index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub posts: Vec<PostResponse>,
    pub page: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_owner_is_optional() {
        let form: PostForm = serde_json::from_str(r#"{"title":"t","text":"b"}"#).unwrap();
        assert!(form.owner_id.is_none());

        let form: PostForm =
            serde_json::from_str(r#"{"title":"t","text":"b","owner_id":"someone"}"#).unwrap();
        assert_eq!(form.owner_id, Some(serde_json::json!("someone")));
    }

    #[test]
    fn test_post_form_accepts_owner_of_any_type() {
        for owner in ["42", "true", "null", r#"{"id":7}"#, "[1,2]"] {
            let raw = format!(r#"{{"title":"t","text":"b","owner_id":{owner}}}"#);
            let form: PostForm = serde_json::from_str(&raw).unwrap();
            assert_eq!(form.title, "t");
            assert_eq!(form.text, "b");
        }
    }
}
