//! Application services - use cases composed over the ports.

mod blog;

pub use blog::BlogService;
