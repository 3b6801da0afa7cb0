//! Posts: the owned resource of the content service.
//!
//! Reads are open to any authenticated subject; edits and deletes go through
//! the ownership guard in `quill-auth`.

pub mod post;
pub mod service;
pub mod store;

pub use post::{NewPost, Post, PostChanges};
pub use service::PostService;
pub use store::PostStore;
