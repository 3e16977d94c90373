//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{DEFAULT_PER_PAGE, PageWindow, PostPage};
pub use post::{Post, PostDraft, TITLE_MAX_CHARS};
pub use user::{User, normalize_email};
