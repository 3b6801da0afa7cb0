//! Infrastructure layer: identity and post stores (in-memory and Postgres).

pub mod db;
pub mod identity_store;
pub mod post_store;


pub use identity_store::{InMemoryIdentityStore, PostgresIdentityStore};
pub use post_store::{InMemoryPostStore, PostgresPostStore};
