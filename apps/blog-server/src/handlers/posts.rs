//! Blog post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use campus_core::domain::{PageWindow, Post, PostDraft};
use campus_shared::dto::{PageMeta, PostForm, PostPageResponse, PostResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        owner_id: post.owner_id.to_string(),
        title: post.title,
        text: post.text,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn page_meta(window: &PageWindow) -> PageMeta {
    PageMeta {
        number: window.number,
        num_pages: window.num_pages,
        per_page: window.per_page,
        total: window.total,
        has_next: window.has_next(),
        has_previous: window.has_previous(),
        is_paginated: window.has_other_pages(),
    }
}

/// The form's owner field is ignored; the post belongs to whoever is logged in.
fn draft_from(form: PostForm) -> PostDraft {
    if form.owner_id.is_some() {
        tracing::debug!("Ignoring client-supplied owner on post form");
    }
    PostDraft::new(form.title, form.text)
}

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.blog.list_posts(query.page.as_deref()).await?;

    Ok(HttpResponse::Ok().json(PostPageResponse {
        page: page_meta(&page.window),
        posts: page.posts.into_iter().map(post_response).collect(),
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .create_post(identity.user_id, draft_from(form.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .post_for_edit(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .edit_post(
            identity.user_id,
            path.into_inner(),
            draft_from(form.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .blog
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
