// Storage layer
// Decision: PostgreSQL in production, in-memory when no DATABASE_URL is configured

pub mod backend;
pub mod memory;
pub mod models;
pub mod password;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use password::{hash_password, verify_against_dummy, verify_password};
pub use repositories::Database;
