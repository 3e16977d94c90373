//! Ports - what the blog needs from storage and authentication.
//! `campus-infra` provides Postgres, in-memory, JWT and Argon2 adapters.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{BaseRepository, PostRepository, UserRepository};
