mod kv;
mod repository;
mod schema;
mod types;

pub use kv::{KeyValueStore, MemoryStore};
pub use repository::{MovieRepository, MOVIES_KEY};
pub use schema::Database;
pub use types::{DatabaseError, StoreError};
