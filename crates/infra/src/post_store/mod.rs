//! Post store adapters.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;
